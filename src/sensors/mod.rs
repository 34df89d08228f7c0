use crate::errors::SensorResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "mpl115a2")]
pub mod mpl115a2;
#[cfg(feature = "ms5837")]
pub mod ms5837;

#[cfg(test)]
pub(crate) mod sim;

#[cfg(feature = "mpl115a2")]
pub use mpl115a2::Mpl115a2;
#[cfg(feature = "ms5837")]
pub use ms5837::Ms5837;

pub const MS5837_ADDRESS: u8 = 0x76;
pub const MPL115A2_ADDRESS: u8 = 0x60;

/// Fresh water, kg/m^3. Sea water is about 1029.
pub const DEFAULT_FLUID_DENSITY: f32 = 997.0;

/// MS5837 variant, selects the compensation formula and pressure resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ms5837Model {
    /// MS5837-30BA, 0-30 bar, 0.1 mbar resolution
    #[serde(rename = "30ba")]
    Bar30,
    /// MS5837-02BA, 0-2 bar, 0.01 mbar resolution
    #[serde(rename = "02ba")]
    Bar02,
}

/// Minimal capability every pressure sensor on the bus exposes.
///
/// The bus is owned by the caller and lent to the driver for each call, so
/// several sensors can share one adapter.
#[async_trait]
pub trait PressureSensor<B: Send>: Send {
    /// Probe and prepare the device. Safe to call again after a failure.
    async fn init(&mut self, bus: &mut B) -> SensorResult<()>;

    /// Take one pressure sample, in the sensor's native unit.
    async fn read_raw(&mut self, bus: &mut B) -> SensorResult<f32>;

    fn id(&self) -> &str;
}

/// A pressure sensor submerged in a fluid (MS5837 style)
pub trait DepthSensor<B: Send>: PressureSensor<B> {
    fn set_model(&mut self, model: Ms5837Model);

    /// kg/m^3
    fn set_fluid_density(&mut self, density: f32);

    /// Last converted temperature, deg C
    fn temperature(&self) -> f32;

    /// Depth below the surface in meters, from the last conversion
    fn depth(&self) -> f32;

    /// Altitude above mean sea level in meters, from the last conversion
    fn altitude(&self) -> f32;
}
