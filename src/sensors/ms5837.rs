use super::{DepthSensor, Ms5837Model, PressureSensor, DEFAULT_FLUID_DENSITY};
use crate::errors::{SensorError, SensorResult};
use async_trait::async_trait;
use embedded_hal::i2c::I2c;
use tokio::time::{sleep, Duration};
use tracing::{debug, trace};

// Commands for the MS5837
const CMD_RESET: u8 = 0x1E;
const CMD_ADC_READ: u8 = 0x00;
const CMD_PROM_READ: u8 = 0xA0;
const CMD_CONVERT_D1_OSR8192: u8 = 0x4A;
const CMD_CONVERT_D2_OSR8192: u8 = 0x5A;

const RESET_DELAY: Duration = Duration::from_millis(10);
// Max conversion time at OSR 8192 is 17.2 ms
const CONVERSION_DELAY: Duration = Duration::from_millis(20);

const PA_PER_MBAR: f32 = 100.0;
const SURFACE_PRESSURE_PA: f32 = 101300.0;
const STANDARD_GRAVITY: f32 = 9.80665;

pub struct Ms5837 {
    id: String,
    address: u8,
    model: Ms5837Model,
    fluid_density: f32,
    prom: Option<[u16; 7]>,
    /// Compensated pressure in 1/10 or 1/100 mbar depending on model
    pressure_raw: i64,
    /// Compensated temperature in 1/100 deg C
    temperature_raw: i64,
}

impl Ms5837 {
    pub fn new(id: String, address: u8) -> Self {
        Self {
            id,
            address,
            model: Ms5837Model::Bar30,
            fluid_density: DEFAULT_FLUID_DENSITY,
            prom: None,
            pressure_raw: 0,
            temperature_raw: 0,
        }
    }

    pub fn model(&self) -> Ms5837Model {
        self.model
    }

    /// Run a D1/D2 conversion pair and update the stored pressure and temperature.
    pub async fn read<B: I2c + Send>(&mut self, bus: &mut B) -> SensorResult<()> {
        let prom = self.prom.ok_or_else(|| SensorError::ReadError {
            sensor: self.id.clone(),
            reason: "sensor not initialized".to_string(),
        })?;

        let d1 = self.convert(bus, CMD_CONVERT_D1_OSR8192).await?;
        let d2 = self.convert(bus, CMD_CONVERT_D2_OSR8192).await?;
        trace!("[{}] D1={} D2={}", self.id, d1, d2);

        let (pressure, temperature) = compensate(self.model, &prom, d1, d2);
        self.pressure_raw = pressure;
        self.temperature_raw = temperature;
        Ok(())
    }

    pub fn set_model(&mut self, model: Ms5837Model) {
        self.model = model;
    }

    /// kg/m^3
    pub fn set_fluid_density(&mut self, density: f32) {
        self.fluid_density = density;
    }

    /// Pressure from the last conversion, mbar
    pub fn pressure(&self) -> f32 {
        match self.model {
            Ms5837Model::Bar30 => self.pressure_raw as f32 / 10.0,
            Ms5837Model::Bar02 => self.pressure_raw as f32 / 100.0,
        }
    }

    /// Temperature from the last conversion, deg C
    pub fn temperature(&self) -> f32 {
        self.temperature_raw as f32 / 100.0
    }

    /// Depth in meters, assuming the surface sits at 1013 mbar
    pub fn depth(&self) -> f32 {
        (self.pressure() * PA_PER_MBAR - SURFACE_PRESSURE_PA) / (self.fluid_density * STANDARD_GRAVITY)
    }

    /// Barometric altitude in meters
    pub fn altitude(&self) -> f32 {
        (1.0 - (self.pressure() / 1013.25).powf(0.190284)) * 145366.45 * 0.3048
    }

    async fn convert<B: I2c + Send>(&self, bus: &mut B, command: u8) -> SensorResult<u32> {
        bus.write(self.address, &[command])
            .map_err(|e| SensorError::i2c(&self.id, e))?;
        sleep(CONVERSION_DELAY).await;

        // ADC result is 24 bit big endian
        let mut buf = [0u8; 4];
        bus.write_read(self.address, &[CMD_ADC_READ], &mut buf[1..])
            .map_err(|e| SensorError::i2c(&self.id, e))?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_prom<B: I2c>(&self, bus: &mut B) -> SensorResult<[u16; 7]> {
        let mut prom = [0u16; 7];
        for (i, word) in prom.iter_mut().enumerate() {
            let mut buf = [0u8; 2];
            bus.write_read(self.address, &[CMD_PROM_READ + (i as u8) * 2], &mut buf)
                .map_err(|e| SensorError::i2c(&self.id, e))?;
            *word = u16::from_be_bytes(buf);
        }
        Ok(prom)
    }
}

#[async_trait]
impl<B> PressureSensor<B> for Ms5837
where
    B: I2c + Send,
{
    async fn init(&mut self, bus: &mut B) -> SensorResult<()> {
        bus.write(self.address, &[CMD_RESET])
            .map_err(|e| SensorError::i2c(&self.id, e))?;
        sleep(RESET_DELAY).await;

        let prom = self.read_prom(bus)?;
        let expected = (prom[0] >> 12) as u8;
        let actual = crc4(&prom);
        if expected != actual {
            return Err(SensorError::PromCrcMismatch {
                sensor: self.id.clone(),
                expected,
                actual,
            });
        }

        debug!("[{}] PROM coefficients: {:?}", self.id, &prom[1..]);
        self.prom = Some(prom);
        Ok(())
    }

    async fn read_raw(&mut self, bus: &mut B) -> SensorResult<f32> {
        self.read(bus).await?;
        Ok(self.pressure())
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl<B> DepthSensor<B> for Ms5837
where
    B: I2c + Send,
{
    fn set_model(&mut self, model: Ms5837Model) {
        Ms5837::set_model(self, model)
    }

    fn set_fluid_density(&mut self, density: f32) {
        Ms5837::set_fluid_density(self, density)
    }

    fn temperature(&self) -> f32 {
        Ms5837::temperature(self)
    }

    fn depth(&self) -> f32 {
        Ms5837::depth(self)
    }

    fn altitude(&self) -> f32 {
        Ms5837::altitude(self)
    }
}

/// 4 bit CRC over the PROM, as given in the datasheet.
///
/// The CRC itself lives in the top nibble of word 0 and is masked out here.
fn crc4(prom: &[u16; 7]) -> u8 {
    let mut remainder: u16 = 0;
    let words = prom
        .iter()
        .enumerate()
        .map(|(i, &word)| if i == 0 { word & 0x0FFF } else { word })
        .chain(std::iter::once(0u16));

    for byte in words.flat_map(u16::to_be_bytes) {
        remainder ^= byte as u16;
        for _ in 0..8 {
            if remainder & 0x8000 != 0 {
                remainder = (remainder << 1) ^ 0x3000;
            } else {
                remainder <<= 1;
            }
        }
    }
    ((remainder >> 12) & 0x000F) as u8
}

/// First and second order compensation. Returns (pressure, temperature) in
/// model units: 1/10 mbar (30BA) or 1/100 mbar (02BA), and 1/100 deg C.
fn compensate(model: Ms5837Model, prom: &[u16; 7], d1: u32, d2: u32) -> (i64, i64) {
    let c: [i64; 7] = (*prom).map(i64::from);
    let d1 = d1 as i64;
    let dt = d2 as i64 - c[5] * 256;

    let (sens, off) = match model {
        Ms5837Model::Bar02 => (c[1] * 65536 + (c[3] * dt) / 128, c[2] * 131072 + (c[4] * dt) / 64),
        Ms5837Model::Bar30 => (c[1] * 32768 + (c[3] * dt) / 256, c[2] * 65536 + (c[4] * dt) / 128),
    };
    let temp = 2000 + dt * c[6] / 8388608;

    let (ti, offi, sensi) = match model {
        Ms5837Model::Bar02 => {
            if temp / 100 < 20 {
                (
                    (11 * dt * dt) / 34359738368,
                    (31 * (temp - 2000) * (temp - 2000)) / 8,
                    (63 * (temp - 2000) * (temp - 2000)) / 32,
                )
            } else {
                (0, 0, 0)
            }
        }
        Ms5837Model::Bar30 => {
            if temp / 100 < 20 {
                let mut offi = (3 * (temp - 2000) * (temp - 2000)) / 2;
                let mut sensi = (5 * (temp - 2000) * (temp - 2000)) / 8;
                if temp / 100 < -15 {
                    offi += 7 * (temp + 1500) * (temp + 1500);
                    sensi += 4 * (temp + 1500) * (temp + 1500);
                }
                ((3 * dt * dt) / 8589934592, offi, sensi)
            } else {
                ((2 * dt * dt) / 137438953472, ((temp - 2000) * (temp - 2000)) / 16, 0)
            }
        }
    };

    let off2 = off - offi;
    let sens2 = sens - sensi;
    let pressure = match model {
        Ms5837Model::Bar02 => ((d1 * sens2) / 2097152 - off2) / 32768,
        Ms5837Model::Bar30 => ((d1 * sens2) / 2097152 - off2) / 8192,
    };
    (pressure, temp - ti)
}
