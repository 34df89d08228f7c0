use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Error types for the pressure sensors and their bus
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor '{sensor}' I2C communication failed: {kind:?}")]
    I2cError { sensor: String, kind: ErrorKind },

    #[error("Sensor '{sensor}' initialization failed: {reason}")]
    InitError { sensor: String, reason: String },

    #[error("Sensor '{sensor}' PROM CRC mismatch: expected {expected:#03x}, got {actual:#03x}")]
    PromCrcMismatch { sensor: String, expected: u8, actual: u8 },

    #[error("Sensor '{sensor}' read failed: {reason}")]
    ReadError { sensor: String, reason: String },

    #[error("Bus '{bus}' not found or unavailable: {reason}")]
    BusNotFound { bus: String, reason: String },
}

impl SensorError {
    /// Wrap an embedded-hal bus error for the given sensor
    pub fn i2c<E: embedded_hal::i2c::Error>(sensor: &str, error: E) -> Self {
        SensorError::I2cError {
            sensor: sensor.to_string(),
            kind: error.kind(),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<SensorError> for String {
    fn from(error: SensorError) -> Self {
        error.to_string()
    }
}

impl From<ConfigError> for String {
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

/// Result type aliases for convenience
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
