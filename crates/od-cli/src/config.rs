//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use od_core::{CalendarConfig, DEFAULT_UTC_OFFSET_HOURS, ValidationError};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whole-hour UTC offset of the calendar all days are counted in.
    pub utc_offset_hours: i32,

    /// Run document-matching correction before counting.
    pub auto_correct: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            auto_correct: true,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables (OD_*) win over files
        figment = figment.merge(Env::prefixed("OD_"));

        figment.extract()
    }

    /// Builds the calendar every computation is anchored to.
    pub fn calendar(&self) -> Result<CalendarConfig, ValidationError> {
        CalendarConfig::with_offset_hours(self.utc_offset_hours)
    }
}

/// Returns the platform-specific config directory for od.
///
/// On Linux: `~/.config/od`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("od"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.utc_offset_hours, 8);
        assert!(config.auto_correct);
    }

    #[test]
    fn test_dirs_config_path_ends_with_od() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "od");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "utc_offset_hours = -5\nauto_correct = false").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.utc_offset_hours, -5);
        assert!(!config.auto_correct);
    }

    #[test]
    fn test_calendar_rejects_bad_offset() {
        let config = Config {
            utc_offset_hours: 30,
            ..Config::default()
        };
        assert!(config.calendar().is_err());
    }

    #[test]
    fn test_calendar_uses_configured_offset() {
        let config = Config {
            utc_offset_hours: -5,
            ..Config::default()
        };
        let calendar = config.calendar().unwrap();
        assert_eq!(calendar.utc_offset().local_minus_utc(), -5 * 3600);
    }
}
