//! Controller configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bounds::Bounds;
use crate::error::GovernanceError;
use crate::timelock::DEFAULT_DELAY_SECS;

/// Construction-time settings for a [`DistributorController`](crate::DistributorController).
///
/// Can be loaded from a TOML file via [`ControllerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Initial timelock delay in seconds. Later changes go through the
    /// `change-delay` action.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,

    /// Parameter ceilings, fixed for the controller's lifetime.
    #[serde(default)]
    pub bounds: Bounds,
}

fn default_delay_secs() -> u64 {
    DEFAULT_DELAY_SECS
}

impl ControllerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GovernanceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            bounds: Bounds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alb_types::tokens;
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ControllerConfig::from_toml_str("").expect("empty toml should parse");
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.delay_secs, 864_000);
        assert_eq!(config.bounds.max_total_alloc_point, 2500);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            delay_secs = 3600

            [bounds]
            max_deposit_fee_bps = 400
            max_emission_rate = "50e18"
        "#;
        let config = ControllerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.delay_secs, 3600);
        assert_eq!(config.bounds.max_deposit_fee_bps, 400);
        assert_eq!(config.bounds.max_emission_rate, tokens(50));
        assert_eq!(config.bounds.max_fee_percent, 200); // default
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ControllerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("max_emission_rate = \"100000000000000000000\""));
        assert_eq!(ControllerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ControllerConfig::from_toml_str("delay_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, GovernanceError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "delay_secs = 60").unwrap();
        let config = ControllerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.delay_secs, 60);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let err = ControllerConfig::from_toml_file("/nonexistent/governance.toml").unwrap_err();
        assert!(matches!(err, GovernanceError::Config(_)));
    }
}
