//! TOML-based application configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SolterraError;
use crate::estimator::{
    CO2_TONS_PER_KWH, EstimatorConstants, INSTALLATION_COST_PER_KW, RoofTypePolicy,
    TREES_PER_TON_CO2,
};
use crate::records::SolarSystem;
use crate::telemetry::{GeneratorOptions, SampleOrder};

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`AppConfig::from_toml_file`] or use [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Estimator coefficients and roof-type handling.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Mock telemetry generation parameters.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// HTTP service settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Known solar systems, served through the profile registry.
    #[serde(default)]
    pub systems: Vec<SolarSystem>,
}

/// Estimator coefficients and roof-type handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Installed cost per kW (currency units, > 0).
    pub installation_cost_per_kw: f64,
    /// Tonnes of CO2 avoided per kWh (>= 0).
    pub co2_tons_per_kwh: f64,
    /// Tree-equivalent factor per tonne of CO2 (>= 0).
    pub trees_per_ton_co2: f64,
    /// `"strict"` rejects unknown roof types, `"permissive"` maps them to `sloped_other`.
    pub roof_type_policy: RoofTypePolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            installation_cost_per_kw: INSTALLATION_COST_PER_KW,
            co2_tons_per_kwh: CO2_TONS_PER_KWH,
            trees_per_ton_co2: TREES_PER_TON_CO2,
            roof_type_policy: RoofTypePolicy::Strict,
        }
    }
}

impl EstimatorConfig {
    pub fn constants(&self) -> EstimatorConstants {
        EstimatorConstants {
            installation_cost_per_kw: self.installation_cost_per_kw,
            co2_tons_per_kwh: self.co2_tons_per_kwh,
            trees_per_ton_co2: self.trees_per_ton_co2,
        }
    }
}

/// Mock telemetry generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Days generated when a request does not say (must be > 0).
    pub default_days: u32,
    /// Largest window a single request may ask for (days, >= `default_days`).
    pub max_days: u32,
    /// Capacity for systems without one (kW, > 0).
    pub default_capacity_kw: f64,
    /// Battery charge before the first sample (percent, 0-100).
    pub initial_battery_pct: f64,
    /// Battery sensitivity to hourly surplus (> 0).
    pub battery_gain: f64,
    /// `"day_descending"` or `"chronological"`.
    pub order: SampleOrder,
    /// Fixed random seed; fresh entropy per run when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            default_days: 7,
            max_days: options.max_days,
            default_capacity_kw: options.default_capacity_kw,
            initial_battery_pct: options.initial_battery_pct,
            battery_gain: options.battery_gain,
            order: options.order,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            order: self.order,
            initial_battery_pct: self.initial_battery_pct,
            battery_gain: self.battery_gain,
            default_capacity_kw: self.default_capacity_kw,
            max_days: self.max_days,
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generator.default_days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl From<ConfigError> for SolterraError {
    fn from(err: ConfigError) -> Self {
        SolterraError::Config(format!("{} — {}", err.field, err.message))
    }
}

impl AppConfig {
    /// Demo preset: default settings plus one battery-backed system.
    pub fn demo() -> Self {
        Self {
            generator: GeneratorConfig {
                seed: Some(42),
                ..GeneratorConfig::default()
            },
            systems: vec![SolarSystem {
                id: "demo".to_string(),
                name: "My Solar System".to_string(),
                capacity_kw: Some(10.0),
                battery_capacity_kwh: Some(13.5),
                panels_count: Some(24),
                inverter_model: None,
            }],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "demo"];

    /// Loads configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "demo" => Ok(Self::demo()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses configuration from a TOML file.
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

    /// Parses configuration from a TOML string.
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
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError {
                    field: field.into(),
                    message: message.into(),
                });
            }
        };

        let e = &self.estimator;
        check(
            e.installation_cost_per_kw.is_finite() && e.installation_cost_per_kw > 0.0,
            "estimator.installation_cost_per_kw",
            "must be > 0",
        );
        check(
            e.co2_tons_per_kwh.is_finite() && e.co2_tons_per_kwh >= 0.0,
            "estimator.co2_tons_per_kwh",
            "must be >= 0",
        );
        check(
            e.trees_per_ton_co2.is_finite() && e.trees_per_ton_co2 >= 0.0,
            "estimator.trees_per_ton_co2",
            "must be >= 0",
        );

        let g = &self.generator;
        check(g.default_days > 0, "generator.default_days", "must be > 0");
        check(
            g.max_days >= g.default_days,
            "generator.max_days",
            "must be >= generator.default_days",
        );
        check(
            g.default_capacity_kw.is_finite() && g.default_capacity_kw > 0.0,
            "generator.default_capacity_kw",
            "must be > 0",
        );
        check(
            (0.0..=100.0).contains(&g.initial_battery_pct),
            "generator.initial_battery_pct",
            "must be in [0, 100]",
        );
        check(
            g.battery_gain.is_finite() && g.battery_gain > 0.0,
            "generator.battery_gain",
            "must be > 0",
        );

        check(
            self.server.bind.parse::<std::net::SocketAddr>().is_ok(),
            "server.bind",
            "must be a socket address such as 0.0.0.0:3000",
        );

        for (i, sys) in self.systems.iter().enumerate() {
            check(!sys.id.is_empty(), &format!("systems[{i}].id"), "must not be empty");
            if let Some(kw) = sys.capacity_kw {
                check(kw > 0.0, &format!("systems[{i}].capacity_kw"), "must be > 0");
            }
            if let Some(kwh) = sys.battery_capacity_kwh {
                check(
                    kwh >= 0.0,
                    &format!("systems[{i}].battery_capacity_kwh"),
                    "must be >= 0",
                );
            }
            let duplicate = self.systems[..i].iter().any(|other| other.id == sys.id);
            check(!duplicate, &format!("systems[{i}].id"), "duplicate system id");
        }

        errors
    }
}
