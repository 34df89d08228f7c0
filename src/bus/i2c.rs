use crate::errors::{SensorError, SensorResult};
use tracing::info;

/// Linux `/dev/i2c-N` adapter. Implements `embedded_hal::i2c::I2c` and
/// switches the slave address per transaction, so both sensors share it.
pub type I2CBus = linux_embedded_hal::I2cdev;

/// Open the I2C character device at `path`
pub fn open_i2c_bus(path: &str) -> SensorResult<I2CBus> {
    let bus = I2CBus::new(path).map_err(|e| SensorError::BusNotFound {
        bus: path.to_string(),
        reason: e.to_string(),
    })?;
    info!("[bus] opened {}", path);
    Ok(bus)
}
