use crate::config::{DepthSensorEntry, PressureConfig, SamplingConfig};
use crate::sampling::Averager;
use crate::sensors::{DepthSensor, PressureSensor};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// MPL115A2 reports kPa, the MS5837 mbar
pub const BAROMETER_TO_MBAR: f32 = 10.0;

/// Owns the shared bus and both pressure sensors, and holds the calibration
/// offset between them.
///
/// `A` is the submerged depth sensor (sensor 1), `S` the barometer (sensor 2).
pub struct PressureStation<B, A, S> {
    bus: B,
    depth_sensor: A,
    barometer: S,
    depth_config: DepthSensorEntry,
    sampling: SamplingConfig,
    last_depth_sample: f32,
    last_barometer_sample: f32,
    offset: Option<f32>,
}

impl<B, A, S> PressureStation<B, A, S>
where
    B: Send,
    A: DepthSensor<B>,
    S: PressureSensor<B>,
{
    pub fn new(bus: B, depth_sensor: A, barometer: S, config: &PressureConfig) -> Self {
        Self {
            bus,
            depth_sensor,
            barometer,
            depth_config: config.depth_sensor.clone(),
            sampling: config.sampling.clone(),
            last_depth_sample: 0.0,
            last_barometer_sample: 0.0,
            offset: None,
        }
    }

    /// Bring both sensors up and calibrate the offset between them.
    ///
    /// Does not return until the depth sensor answers: its init is retried
    /// forever. The barometer gets a single attempt. Returns the new offset,
    /// `avg(sensor 2) * 10 - avg(sensor 1)`.
    pub async fn start_pressure_sensors(&mut self) -> f32 {
        let attempts = self.init_depth_sensor().await;
        info!("[station] {} ready after {} attempt(s)", self.depth_sensor.id(), attempts);

        if let Err(e) = self.barometer.init(&mut self.bus).await {
            warn!("[station] {} init failed, readings will be wrong: {}", self.barometer.id(), e);
        }

        self.depth_sensor.set_model(self.depth_config.model);
        self.depth_sensor.set_fluid_density(self.depth_config.fluid_density);

        let mut depth_avg = Averager::new();
        let mut baro_avg = Averager::new();
        for _ in 0..self.sampling.samples {
            depth_avg.push(self.sample_depth_sensor().await);
            baro_avg.push(self.sample_barometer().await);
            sleep(self.sampling.sample_interval()).await;
        }

        let offset = baro_avg.mean() * BAROMETER_TO_MBAR - depth_avg.mean();
        info!(
            "[station] calibrated: sensor1={:.2} mbar sensor2={:.2} mbar offset={:.2} mbar",
            depth_avg.mean(),
            baro_avg.mean() * BAROMETER_TO_MBAR,
            offset
        );
        self.offset = Some(offset);
        offset
    }

    /// Averaged depth sensor pressure, mbar
    pub async fn get_pressure_1(&mut self) -> f32 {
        let mut avg = Averager::new();
        for _ in 0..self.sampling.samples {
            avg.push(self.sample_depth_sensor().await);
            sleep(self.sampling.sample_interval()).await;
        }
        avg.mean()
    }

    /// Averaged barometer pressure, scaled to mbar
    pub async fn get_pressure_2(&mut self) -> f32 {
        let mut avg = Averager::new();
        for _ in 0..self.sampling.samples {
            avg.push(self.sample_barometer().await);
            sleep(self.sampling.sample_interval()).await;
        }
        avg.mean() * BAROMETER_TO_MBAR
    }

    /// Calibration offset, `None` until `start_pressure_sensors` has run
    pub fn offset(&self) -> Option<f32> {
        self.offset
    }

    /// Depth in meters from the depth sensor's last conversion
    pub fn depth(&self) -> f32 {
        self.depth_sensor.depth()
    }

    /// Water temperature from the depth sensor's last conversion, deg C
    pub fn temperature(&self) -> f32 {
        self.depth_sensor.temperature()
    }

    /// Altitude above mean sea level in meters, from the depth sensor's last conversion
    pub fn altitude(&self) -> f32 {
        self.depth_sensor.altitude()
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Give back the bus and sensors
    pub fn release(self) -> (B, A, S) {
        (self.bus, self.depth_sensor, self.barometer)
    }

    async fn init_depth_sensor(&mut self) -> u32 {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.depth_sensor.init(&mut self.bus).await {
                Ok(()) => return attempt,
                Err(e) => {
                    warn!(
                        "[station] {} init attempt {} failed: {}",
                        self.depth_sensor.id(),
                        attempt,
                        e
                    );
                    sleep(self.sampling.init_retry()).await;
                }
            }
        }
    }

    // A failed sample repeats the previous one (0.0 before the first success)
    async fn sample_depth_sensor(&mut self) -> f32 {
        match self.depth_sensor.read_raw(&mut self.bus).await {
            Ok(pressure) => {
                debug!("[station] {} sample {:.2}", self.depth_sensor.id(), pressure);
                self.last_depth_sample = pressure;
            }
            Err(e) => warn!("[station] {} read failed, reusing last sample: {}", self.depth_sensor.id(), e),
        }
        self.last_depth_sample
    }

    async fn sample_barometer(&mut self) -> f32 {
        match self.barometer.read_raw(&mut self.bus).await {
            Ok(pressure) => {
                debug!("[station] {} sample {:.3}", self.barometer.id(), pressure);
                self.last_barometer_sample = pressure;
            }
            Err(e) => warn!("[station] {} read failed, reusing last sample: {}", self.barometer.id(), e),
        }
        self.last_barometer_sample
    }
}
