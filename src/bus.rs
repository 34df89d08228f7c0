#[cfg(target_os = "linux")]
pub mod i2c;

#[cfg(target_os = "linux")]
pub use i2c::{open_i2c_bus, I2CBus};
