//! Settings for the checker and CLI
//!
//! Supports loading settings from:
//! - Default values
//! - Settings file (conftype.toml)
//! - Environment variables (CONFTYPE__*)
//!
//! ## Example settings file (conftype.toml):
//! ```toml
//! [parser]
//! allow_trailing_tokens = false
//!
//! [report]
//! format = "json"
//! fail_on_invalid = true
//! warn_undeclared = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::parser::ParseOptions;

/// Main settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Constraint parser settings
    #[serde(default)]
    pub parser: ParseOptions,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format (text or json)
    #[serde(default)]
    pub format: ReportFormat,

    /// Exit non-zero when any key is invalid or malformed
    #[serde(default = "default_true")]
    pub fail_on_invalid: bool,

    /// Warn about values that have no declared constraint
    #[serde(default)]
    pub warn_undeclared: bool,
}

/// How a report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            fail_on_invalid: true,
            warn_undeclared: false,
        }
    }
}

impl Settings {
    /// Load settings, adding a specific file on top of the defaults
    pub fn load_from(settings_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let locations = ["conftype.toml", ".conftype.toml", "config/conftype.toml"];
        for location in locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "conftype") {
            let xdg_settings = dirs.config_dir().join("conftype.toml");
            if xdg_settings.exists() {
                builder = builder.add_source(File::from(xdg_settings).required(false));
            }
        }

        if let Some(path) = settings_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // CONFTYPE__REPORT__FORMAT=json
        builder = builder.add_source(
            Environment::with_prefix("CONFTYPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.parser.allow_trailing_tokens);
        assert!(settings.report.fail_on_invalid);
        assert_eq!(settings.report.format, ReportFormat::Text);
    }

    #[test]
    fn test_serialize_settings() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("[parser]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("format = \"text\""));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[parser]\nallow_trailing_tokens = true\n\n[report]\nformat = \"json\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(path.to_str()).unwrap();
        assert!(settings.parse_options().allow_trailing_tokens);
        assert_eq!(settings.report.format, ReportFormat::Json);
        assert!(settings.report.fail_on_invalid);
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut settings = Settings::default();
        settings.report.warn_undeclared = true;
        settings.save(path.to_str().unwrap()).unwrap();

        let loaded = Settings::load_from(path.to_str()).unwrap();
        assert_eq!(loaded, settings);
    }
}
