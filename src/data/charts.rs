//! Chart-ready aggregates for the dashboard plots.
//!
//! Everything here is a pure function of a record slice so the plots can be
//! rebuilt on every frame from the current filtered view.

use super::model::Record;

// ---------------------------------------------------------------------------
// Overlay histogram
// ---------------------------------------------------------------------------

/// Equal-width bins shared by every group.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    /// `(group, counts per bin)` in the order the groups were requested.
    pub series: Vec<(String, Vec<usize>)>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.series.first().map_or(0, |(_, c)| c.len())
    }

    /// Centre of bin `i`, used as the bar position.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + self.bin_width * (i as f64 + 0.5)
    }
}

/// Bin `value(record)` over the observed range of all `records`, counting
/// per personality group. The last bin includes the maximum.
///
/// Returns `None` when there are no records or `bins` is zero.
pub fn histogram_by_group(
    records: &[Record],
    groups: &[String],
    value: impl Fn(&Record) -> f64,
    bins: usize,
) -> Option<Histogram> {
    if records.is_empty() || bins == 0 {
        return None;
    }
    let min = records.iter().map(&value).fold(f64::INFINITY, f64::min);
    let max = records.iter().map(&value).fold(f64::NEG_INFINITY, f64::max);

    // A single distinct value gets one unit-wide bin centred on it.
    let (start, bin_width, bins) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, 1.0, 1)
    } else {
        (min, (max - min) / bins as f64, bins)
    };

    let mut series: Vec<(String, Vec<usize>)> =
        groups.iter().map(|g| (g.clone(), vec![0; bins])).collect();

    for r in records {
        let Some((_, counts)) = series.iter_mut().find(|(g, _)| *g == r.personality) else {
            continue;
        };
        let idx = (((value(r) - start) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram {
        start,
        bin_width,
        series,
    })
}

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary plus Tukey whiskers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(sorted[0]);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(sorted[sorted.len() - 1]);

    Some(BoxStats {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
    })
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Row counts per (group, category).
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    /// Category values, first-encountered order.
    pub categories: Vec<String>,
    /// `(group, count per category)` in the order the groups were requested.
    pub series: Vec<(String, Vec<usize>)>,
}

pub fn cross_tab<'a>(
    records: &'a [Record],
    groups: &[String],
    category: impl Fn(&'a Record) -> &'a str,
) -> CrossTab {
    let mut categories: Vec<String> = Vec::new();
    for r in records {
        let c = category(r);
        if !categories.iter().any(|seen| seen == c) {
            categories.push(c.to_string());
        }
    }

    let mut series: Vec<(String, Vec<usize>)> = groups
        .iter()
        .map(|g| (g.clone(), vec![0; categories.len()]))
        .collect();

    for r in records {
        let Some((_, counts)) = series.iter_mut().find(|(g, _)| *g == r.personality) else {
            continue;
        };
        if let Some(idx) = categories.iter().position(|c| c == category(r)) {
            counts[idx] += 1;
        }
    }

    CrossTab { categories, series }
}
