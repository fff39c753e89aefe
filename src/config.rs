//! Dashboard configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variable `PERSONALITY_DASHBOARD_URL` (data source only)
//! 2. The TOML file named by `PERSONALITY_DASHBOARD_CONFIG`
//! 3. `dashboard.toml` in the working directory
//! 4. Compiled defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "PERSONALITY_DASHBOARD_CONFIG";
pub const URL_ENV: &str = "PERSONALITY_DASHBOARD_URL";
pub const PROJECT_CONFIG_FILE: &str = "dashboard.toml";

pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/ibtysxmslhx/mini-project/main/cleaned_personality_dataset.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Remote CSV offered in the URL field.
    pub url: String,
    /// Fetch `url` as soon as the window opens.
    pub load_on_start: bool,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            load_on_start: true,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Optional header image (png/jpg) shown above the dashboard.
    pub banner_image: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Personality Data Dashboard".to_string(),
            width: 1280.0,
            height: 860.0,
            banner_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub histogram_bins: usize,
    /// Hex colours assigned to personality types in first-seen order.
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 15,
            palette: vec!["#CDAF9C".into(), "#34464D".into(), "#98ABA1".into(), "#CFC5B0".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub window: WindowConfig,
    pub charts: ChartConfig,
}

impl DashboardConfig {
    /// Resolve the configuration from the environment and working directory.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(PROJECT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(PROJECT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                config.source.url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.charts.histogram_bins == 0 {
            bail!("charts.histogram_bins must be at least 1");
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be at least 1");
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            bail!("window.width and window.height must be positive");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.charts.histogram_bins, 15);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = DashboardConfig::from_toml(
            r##"
            [source]
            url = "https://example.org/people.csv"
            load_on_start = false

            [charts]
            palette = ["#000000"]
            "##,
        )
        .unwrap();
        assert_eq!(config.source.url, "https://example.org/people.csv");
        assert!(!config.source.load_on_start);
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.charts.palette, vec!["#000000"]);
        assert_eq!(config.charts.histogram_bins, 15);
    }

    #[test]
    fn zero_bins_is_rejected() {
        assert!(DashboardConfig::from_toml("[charts]\nhistogram_bins = 0\n").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "[source]\ntimeout_secs = 5\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dashboard.toml"));
    }
}
