use serde::Deserialize;

/// The `[bus]` section: the I2C adapter both sensors hang off
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusEntry {
    pub path: String,
}

impl Default for BusEntry {
    fn default() -> Self {
        Self {
            path: "/dev/i2c-1".to_string(),
        }
    }
}
