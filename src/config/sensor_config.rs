use crate::sensors::{Ms5837Model, DEFAULT_FLUID_DENSITY, MPL115A2_ADDRESS, MS5837_ADDRESS};
use serde::Deserialize;
use std::time::Duration;

/// The `[depth_sensor]` section (MS5837)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DepthSensorEntry {
    pub address: u8,
    pub model: Ms5837Model,
    /// kg/m^3
    pub fluid_density: f32,
}

impl Default for DepthSensorEntry {
    fn default() -> Self {
        Self {
            address: MS5837_ADDRESS,
            model: Ms5837Model::Bar30,
            fluid_density: DEFAULT_FLUID_DENSITY,
        }
    }
}

/// The `[barometer]` section (MPL115A2)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarometerEntry {
    pub address: u8,
}

impl Default for BarometerEntry {
    fn default() -> Self {
        Self {
            address: MPL115A2_ADDRESS,
        }
    }
}

/// The `[sampling]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Samples averaged per read
    pub samples: u32,
    pub sample_interval_ms: u64,
    /// Delay between depth sensor init attempts
    pub init_retry_ms: u64,
    /// Daemon publish period
    pub publish_interval_ms: u64,
}

impl SamplingConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn init_retry(&self) -> Duration {
        Duration::from_millis(self.init_retry_ms)
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: 5,
            sample_interval_ms: 15,
            init_retry_ms: 250,
            publish_interval_ms: 1000,
        }
    }
}
