//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tcal_core::YearPolicy;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How week headers with no explicit year are resolved.
    pub year_policy: YearPolicy,

    /// Default location for timed events lacking one; the `--location`
    /// flag takes precedence.
    pub location: Option<String>,
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

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TCAL_*)
        figment = figment.merge(Env::prefixed("TCAL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tcal.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tcal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_nearest_year_policy() {
        let config = Config::default();
        assert_eq!(config.year_policy, YearPolicy::Nearest);
        assert!(config.location.is_none());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            year_policy: YearPolicy::Current,
            location: Some("Campus".into()),
        };

        let loaded: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                "year_policy = \"current\"\nlocation = \"Campus\"",
            ))
            .extract()
            .unwrap();

        assert_eq!(loaded.year_policy, config.year_policy);
        assert_eq!(loaded.location, config.location);
    }
}
