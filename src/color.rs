use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#RRGGBB` (or `RRGGBB`) into a colour.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Color mapping: personality type → Color32
// ---------------------------------------------------------------------------

/// Maps each personality type to a colour, stable across filter changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign configured colours to `groups` in order; any group beyond the
    /// configured palette (or with an unparsable entry) gets a generated hue.
    pub fn new(groups: &[String], configured: &[String]) -> Self {
        let generated = generate_palette(groups.len());
        let mapping = groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let color = configured
                    .get(i)
                    .and_then(|hex| {
                        let parsed = parse_hex(hex);
                        if parsed.is_none() {
                            log::warn!("Ignoring invalid palette colour {hex:?}");
                        }
                        parsed
                    })
                    .unwrap_or(generated[i]);
                (g.clone(), color)
            })
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a personality type.
    pub fn color_for(&self, group: &str) -> Color32 {
        self.mapping
            .get(group)
            .copied()
            .unwrap_or(self.default_color)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap::new(&[], &[])
    }
}
