//! Engine configuration file support.
//!
//! Settings are read from a TOML file; every field has a default so an empty
//! file (or no file at all) yields the stock dashboard behavior.
//!
//! ```toml
//! bin_count = 10
//! label_precision = 2
//! bar_opacity = 0.45
//! tooltip_line_separator = "<br>"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::algorithms::binning::{DEFAULT_BIN_COUNT, DEFAULT_LABEL_PRECISION};
use crate::error::{EngineError, EngineResult, ErrorContext};

/// Largest accepted number of decimals in bin labels.
pub const MAX_LABEL_PRECISION: usize = 10;

/// Histogram engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of numeric bins shared by all compared workflows.
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    /// Decimals shown in numeric bin labels.
    #[serde(default = "default_label_precision")]
    pub label_precision: usize,
    /// Opacity of each overlaid bar layer.
    #[serde(default = "default_bar_opacity")]
    pub bar_opacity: f64,
    #[serde(default = "default_schema_url")]
    pub schema_url: String,
    /// Joins the per-workflow lines of a bin tooltip.
    #[serde(default = "default_tooltip_line_separator")]
    pub tooltip_line_separator: String,
    /// Swatch color for workflows the color scale does not know.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,
    /// Emit zero-count rows for categories a workflow never reported.
    #[serde(default = "default_categorical_zero_fill")]
    pub categorical_zero_fill: bool,
}

fn default_bin_count() -> usize {
    DEFAULT_BIN_COUNT
}

fn default_label_precision() -> usize {
    DEFAULT_LABEL_PRECISION
}

fn default_bar_opacity() -> f64 {
    0.45
}

fn default_schema_url() -> String {
    "https://vega.github.io/schema/vega-lite/v5.json".to_string()
}

fn default_tooltip_line_separator() -> String {
    "<br>".to_string()
}

fn default_fallback_color() -> String {
    "#999".to_string()
}

fn default_categorical_zero_fill() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            label_precision: default_label_precision(),
            bar_opacity: default_bar_opacity(),
            schema_url: default_schema_url(),
            tooltip_line_separator: default_tooltip_line_separator(),
            fallback_color: default_fallback_color(),
            categorical_zero_fill: default_categorical_zero_fill(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if the file was read, parsed and validated
    /// * `Err(EngineError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| {
            EngineError::configuration_with_context(
                format!("Failed to parse config file: {}", e),
                ErrorContext::new("parse_config"),
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `monitor.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to [`EngineConfig::default`] when no file exists.
    pub fn from_default_location() -> EngineResult<Self> {
        let search_paths = [
            PathBuf::from("monitor.toml"),
            PathBuf::from("rust_backend/monitor.toml"),
            PathBuf::from("../monitor.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading engine configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> EngineResult<()> {
        let context = || ErrorContext::new("validate_config");

        if self.bin_count == 0 {
            return Err(EngineError::configuration_with_context(
                "bin_count must be greater than zero",
                context().with_details("bin_count=0"),
            ));
        }

        if self.label_precision > MAX_LABEL_PRECISION {
            return Err(EngineError::configuration_with_context(
                format!("label_precision must be at most {}", MAX_LABEL_PRECISION),
                context().with_details(format!("label_precision={}", self.label_precision)),
            ));
        }

        if !(0.0..=1.0).contains(&self.bar_opacity) {
            return Err(EngineError::configuration_with_context(
                "bar_opacity must lie within [0, 1]",
                context().with_details(format!("bar_opacity={}", self.bar_opacity)),
            ));
        }

        Ok(())
    }

    /// Validated bin count.
    pub fn bin_count(&self) -> EngineResult<NonZeroUsize> {
        NonZeroUsize::new(self.bin_count).ok_or_else(|| {
            EngineError::configuration_with_context(
                "bin_count must be greater than zero",
                ErrorContext::new("bin_count"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.bin_count, 10);
        assert_eq!(config.label_precision, 2);
        assert_eq!(config.bar_opacity, 0.45);
        assert_eq!(config.fallback_color, "#999");
        assert!(config.categorical_zero_fill);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str("bin_count = 20\nbar_opacity = 0.7\n").unwrap();

        assert_eq!(config.bin_count, 20);
        assert_eq!(config.bar_opacity, 0.7);
        assert_eq!(config.label_precision, 2);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = EngineConfig::from_toml_str("bin_count = 0").unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("bin_count"));
    }

    #[test]
    fn test_negative_bins_rejected() {
        let err = EngineConfig::from_toml_str("bin_count = -3").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_opacity_out_of_range_rejected() {
        let err = EngineConfig::from_toml_str("bar_opacity = 1.5").unwrap_err();
        assert!(err.to_string().contains("bar_opacity"));
    }

    #[test]
    fn test_precision_too_large_rejected() {
        assert!(EngineConfig::from_toml_str("label_precision = 11").is_err());
        assert!(EngineConfig::from_toml_str("label_precision = 0").is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bin_count = 5").unwrap();
        writeln!(file, "tooltip_line_separator = \"\\n\"").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();

        assert_eq!(config.bin_count, 5);
        assert_eq!(config.tooltip_line_separator, "\n");
        assert_eq!(config.bin_count().unwrap().get(), 5);
    }

    #[test]
    fn test_from_missing_file() {
        let err = EngineConfig::from_file("/definitely/not/here/monitor.toml").unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(err.context().operation.as_deref(), Some("load_config"));
    }
}
