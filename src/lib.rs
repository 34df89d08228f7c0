// Public modules
pub mod bus;
pub mod config;
pub mod errors;
pub mod messages;
pub mod sampling;
pub mod scheduler;
pub mod sensors;
pub mod station;

// Re-export commonly used types
pub use config::{load_pressure_config, PressureConfig};
pub use errors::{ConfigError, SensorError, SensorResult};
pub use messages::PressureMessage;
#[cfg(feature = "mpl115a2")]
pub use sensors::Mpl115a2;
#[cfg(feature = "ms5837")]
pub use sensors::Ms5837;
pub use sensors::{DepthSensor, PressureSensor};
pub use station::PressureStation;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Bring up both sensors, calibrate, then print one JSON reading per publish
/// interval on stdout until Ctrl-C.
#[cfg(all(target_os = "linux", feature = "ms5837", feature = "mpl115a2"))]
pub async fn run_pressure_station(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing::info;

    info!("[NavigatePressure] starting up...");

    let config_file = format!("{}/pressure.toml", config_path);
    let config = load_pressure_config(&config_file)?;
    info!("[config] loaded {}", config_file);

    let bus = bus::open_i2c_bus(&config.bus.path)?;
    let depth_sensor = Ms5837::new("ms5837".to_string(), config.depth_sensor.address);
    let barometer = Mpl115a2::new("mpl115a2".to_string(), config.barometer.address);
    let mut station = PressureStation::new(bus, depth_sensor, barometer, &config);

    let offset = station.start_pressure_sensors().await;
    info!("[main] sensors started, offset {:.2} mbar", offset);

    let device_id = std::env::var("DEVICE_ID").unwrap_or_else(|_| "navigate_pressure".to_string());
    let publisher = scheduler::run_publisher(&mut station, &device_id, |msg| match msg.to_json() {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!("[main] failed to encode reading: {}", e),
    });

    tokio::select! {
        _ = publisher => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("[main] interrupted, shutting down");
        }
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub async fn run_pressure_station(_config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    Err("I2C is only supported on Linux".into())
}

#[cfg(all(target_os = "linux", not(all(feature = "ms5837", feature = "mpl115a2"))))]
pub async fn run_pressure_station(_config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the ms5837 and mpl115a2 drivers".into())
}
