//! Simulated sensors for exercising the station without hardware.

use super::{DepthSensor, PressureSensor};
use crate::errors::{SensorError, SensorResult};
use crate::sensors::Ms5837Model;
use async_trait::async_trait;
use tokio::time::Instant;

/// Replays a scripted sequence of samples. `None` entries fail the read.
pub struct SimulatedSensor {
    id: String,
    script: Vec<Option<f32>>,
    cursor: usize,
    init_failures: u32,
    pub init_attempts: Vec<Instant>,
    pub reads: usize,
    pub read_times: Vec<Instant>,
    pub model: Option<Ms5837Model>,
    pub fluid_density: Option<f32>,
    last: f32,
}

impl SimulatedSensor {
    pub fn new(id: &str, samples: &[f32]) -> Self {
        Self::scripted(id, samples.iter().copied().map(Some).collect())
    }

    pub fn scripted(id: &str, script: Vec<Option<f32>>) -> Self {
        Self {
            id: id.to_string(),
            script,
            cursor: 0,
            init_failures: 0,
            init_attempts: Vec::new(),
            reads: 0,
            read_times: Vec::new(),
            model: None,
            fluid_density: None,
            last: 0.0,
        }
    }

    /// Fail the first `count` init attempts
    pub fn failing_init(mut self, count: u32) -> Self {
        self.init_failures = count;
        self
    }
}

#[async_trait]
impl<B: Send> PressureSensor<B> for SimulatedSensor {
    async fn init(&mut self, _bus: &mut B) -> SensorResult<()> {
        self.init_attempts.push(Instant::now());
        if self.init_attempts.len() as u32 <= self.init_failures {
            return Err(SensorError::InitError {
                sensor: self.id.clone(),
                reason: "simulated init failure".to_string(),
            });
        }
        Ok(())
    }

    async fn read_raw(&mut self, _bus: &mut B) -> SensorResult<f32> {
        self.reads += 1;
        self.read_times.push(Instant::now());
        let sample = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        match sample {
            Some(value) => {
                self.last = value;
                Ok(value)
            }
            None => Err(SensorError::ReadError {
                sensor: self.id.clone(),
                reason: "simulated read failure".to_string(),
            }),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl<B: Send> DepthSensor<B> for SimulatedSensor {
    fn set_model(&mut self, model: Ms5837Model) {
        self.model = Some(model);
    }

    fn set_fluid_density(&mut self, density: f32) {
        self.fluid_density = Some(density);
    }

    fn temperature(&self) -> f32 {
        20.0
    }

    fn depth(&self) -> f32 {
        (self.last * 100.0 - 101300.0) / (self.fluid_density.unwrap_or(997.0) * 9.80665)
    }

    fn altitude(&self) -> f32 {
        (1.0 - (self.last / 1013.25).powf(0.190284)) * 145366.45 * 0.3048
    }
}
