//! TOML-based builder settings.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::components::SyntheticSolarResource;
use crate::error::AssemblyResult;
use crate::gateway::{CommandGateway, GatewayPolicy};

/// Top-level settings parsed from TOML.
///
/// Every section is optional; missing fields fall back to the defaults
/// documented on each struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    pub gateway: GatewayConfig,
    pub controller: ControllerConfig,
    pub solar: SolarConfig,
    pub logging: LoggingConfig,
}

/// How the external simulation engine is reached.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Deadline per attempt in seconds; `0` waits indefinitely.
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Engine program; receives the document on stdin.
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            retries: 1,
            command: None,
            args: Vec::new(),
        }
    }
}

/// Controller membership settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Mode recorded on new, unconfigured attachments.
    pub default_mode: String,
    /// Refuse to run while a zone-1 component is unattached.
    pub require_configured: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_mode: "nc".to_string(),
            require_configured: true,
        }
    }
}

/// Parameters of the synthetic solar resource model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    pub steps_per_day: usize,
    pub days: usize,
    /// Sunrise step (inclusive).
    pub sunrise_idx: usize,
    /// Sunset step (exclusive).
    pub sunset_idx: usize,
    pub noise_std: f64,
    pub seed: u64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 24,
            days: 365,
            sunrise_idx: 6,
            sunset_idx: 18,
            noise_std: 0.05,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"solar.sunset_idx"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl BuilderConfig {
    /// Parses settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.gateway.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            errors.push(ConfigError {
                field: "gateway.command".into(),
                message: "must not be empty".into(),
            });
        }

        if self.controller.default_mode.trim().is_empty() {
            errors.push(ConfigError {
                field: "controller.default_mode".into(),
                message: "must not be empty".into(),
            });
        }

        let sol = &self.solar;
        if sol.steps_per_day == 0 {
            errors.push(ConfigError {
                field: "solar.steps_per_day".into(),
                message: "must be > 0".into(),
            });
        }
        if sol.days == 0 {
            errors.push(ConfigError {
                field: "solar.days".into(),
                message: "must be > 0".into(),
            });
        }
        if sol.sunrise_idx >= sol.sunset_idx {
            errors.push(ConfigError {
                field: "solar.sunrise_idx".into(),
                message: "must be < solar.sunset_idx".into(),
            });
        }
        if sol.steps_per_day > 0 && sol.sunset_idx > sol.steps_per_day {
            errors.push(ConfigError {
                field: "solar.sunset_idx".into(),
                message: "must be <= solar.steps_per_day".into(),
            });
        }
        if !(sol.noise_std.is_finite() && sol.noise_std >= 0.0) {
            errors.push(ConfigError {
                field: "solar.noise_std".into(),
                message: "must be a non-negative number".into(),
            });
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError {
                field: "logging.filter".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }

    /// Deadline and retry policy for simulation runs.
    pub fn gateway_policy(&self) -> GatewayPolicy {
        GatewayPolicy {
            timeout: (self.gateway.timeout_secs > 0)
                .then(|| Duration::from_secs(self.gateway.timeout_secs)),
            retries: self.gateway.retries,
        }
    }

    /// The configured engine command, if any.
    pub fn command_gateway(&self) -> Option<CommandGateway> {
        self.gateway
            .command
            .as_ref()
            .map(|program| CommandGateway::new(program, self.gateway.args.clone()))
    }

    /// Synthetic solar model described by the `[solar]` section.
    pub fn solar_resource(&self) -> AssemblyResult<SyntheticSolarResource> {
        let s = &self.solar;
        SyntheticSolarResource::new(
            s.steps_per_day,
            s.days,
            s.sunrise_idx,
            s.sunset_idx,
            s.noise_std,
            s.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = BuilderConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "defaults should be valid: {errors:?}");
        assert!(cfg.solar_resource().is_ok());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[gateway]
timeout_secs = 60
retries = 0
command = "mgrid-engine"
args = ["--stdin"]

[controller]
default_mode = "idle"
require_configured = false

[solar]
steps_per_day = 48
days = 2
sunrise_idx = 12
sunset_idx = 36
noise_std = 0.1
seed = 7

[logging]
filter = "mgrid_builder=debug"
"#;
        let cfg = BuilderConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.solar.steps_per_day), Some(48));
        assert_eq!(
            cfg.as_ref().map(|c| c.controller.default_mode.as_str()),
            Some("idle")
        );
        assert_eq!(
            cfg.as_ref().and_then(|c| c.command_gateway()).map(|g| g.args),
            Some(vec!["--stdin".to_string()])
        );
        assert_eq!(
            cfg.map(|c| c.gateway_policy()),
            Some(GatewayPolicy {
                timeout: Some(Duration::from_secs(60)),
                retries: 0,
            })
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = BuilderConfig::from_toml_str("[solar]\nseed = 99\n").ok();
        assert_eq!(cfg.as_ref().map(|c| c.solar.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.solar.days), Some(365));
        assert_eq!(cfg.as_ref().map(|c| c.gateway.retries), Some(1));
        assert!(cfg.as_ref().is_some_and(|c| c.controller.require_configured));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = BuilderConfig::from_toml_str("[gateway]\nbogus = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_waits_forever() {
        let mut cfg = BuilderConfig::default();
        cfg.gateway.timeout_secs = 0;
        assert_eq!(cfg.gateway_policy().timeout, None);
    }

    #[test]
    fn validation_catches_bad_window() {
        let mut cfg = BuilderConfig::default();
        cfg.solar.sunrise_idx = 20;
        cfg.solar.sunset_idx = 30;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "solar.sunset_idx"));
        assert!(!errors.iter().any(|e| e.field == "solar.sunrise_idx"));
    }

    #[test]
    fn validation_catches_empty_mode() {
        let mut cfg = BuilderConfig::default();
        cfg.controller.default_mode = " ".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "controller.default_mode"));
    }
}
