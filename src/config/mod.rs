pub mod bus_config;
pub mod sensor_config;

pub use bus_config::BusEntry;
pub use sensor_config::{BarometerEntry, DepthSensorEntry, SamplingConfig};

use crate::errors::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;

/// Root configuration struct for `pressure.toml`
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    pub bus: BusEntry,
    pub depth_sensor: DepthSensorEntry,
    pub barometer: BarometerEntry,
    pub sampling: SamplingConfig,
}

impl PressureConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sampling.samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sampling.samples".to_string(),
                reason: "at least one sample is required".to_string(),
            });
        }
        let density = self.depth_sensor.fluid_density;
        if density.is_nan() || density <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "depth_sensor.fluid_density".to_string(),
                reason: format!("must be positive, got {}", self.depth_sensor.fluid_density),
            });
        }
        Ok(())
    }
}

/// Parses and validates a TOML document
pub fn parse_pressure_config(content: &str) -> ConfigResult<PressureConfig> {
    let parsed: PressureConfig = toml::from_str(content)?;
    parsed.validate()?;
    Ok(parsed)
}

/// Loads config from TOML file
pub fn load_pressure_config(path: &str) -> ConfigResult<PressureConfig> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
        path: path.to_string(),
        source: e,
    })?;
    parse_pressure_config(&content)
}
