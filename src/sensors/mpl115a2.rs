use super::PressureSensor;
use crate::errors::{SensorError, SensorResult};
use async_trait::async_trait;
use embedded_hal::i2c::I2c;
use tokio::time::{sleep, Duration};
use tracing::{debug, trace};

// Register addresses for the MPL115A2
const REG_PADC_MSB: u8 = 0x00;
const REG_A0_COEFF_MSB: u8 = 0x04;
const REG_START_CONVERSION: u8 = 0x12;

// Datasheet gives 3 ms max for a combined conversion
const CONVERSION_DELAY: Duration = Duration::from_millis(5);

/// Compensation coefficients stored in the device ROM
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a0: f32,
    pub b1: f32,
    pub b2: f32,
    pub c12: f32,
}

impl Coefficients {
    fn from_bytes(buf: &[u8; 8]) -> Self {
        let a0 = i16::from_be_bytes([buf[0], buf[1]]);
        let b1 = i16::from_be_bytes([buf[2], buf[3]]);
        let b2 = i16::from_be_bytes([buf[4], buf[5]]);
        // c12 is 14 bits, left aligned
        let c12 = i16::from_be_bytes([buf[6], buf[7]]) >> 2;
        Self {
            a0: a0 as f32 / 8.0,
            b1: b1 as f32 / 8192.0,
            b2: b2 as f32 / 16384.0,
            c12: c12 as f32 / 4194304.0,
        }
    }

    /// Compensated pressure in kPa from the 10-bit ADC values
    fn pressure(&self, padc: u16, tadc: u16) -> f32 {
        let padc = padc as f32;
        let tadc = tadc as f32;
        let pcomp = self.a0 + (self.b1 + self.c12 * tadc) * padc + self.b2 * tadc;
        (65.0 / 1023.0) * pcomp + 50.0
    }
}

fn temperature_from_adc(tadc: u16) -> f32 {
    (tadc as f32 - 498.0) / -5.35 + 25.0
}

pub struct Mpl115a2 {
    id: String,
    address: u8,
    coefficients: Coefficients,
}

impl Mpl115a2 {
    pub fn new(id: String, address: u8) -> Self {
        Self {
            id,
            address,
            coefficients: Coefficients::default(),
        }
    }

    /// Start a conversion and return (pressure kPa, temperature deg C)
    pub async fn pressure_and_temperature<B: I2c + Send>(&self, bus: &mut B) -> SensorResult<(f32, f32)> {
        bus.write(self.address, &[REG_START_CONVERSION, 0x00])
            .map_err(|e| SensorError::i2c(&self.id, e))?;
        sleep(CONVERSION_DELAY).await;

        let mut buf = [0u8; 4];
        bus.write_read(self.address, &[REG_PADC_MSB], &mut buf)
            .map_err(|e| SensorError::i2c(&self.id, e))?;

        let padc = u16::from_be_bytes([buf[0], buf[1]]) >> 6;
        let tadc = u16::from_be_bytes([buf[2], buf[3]]) >> 6;
        trace!("[{}] Padc={} Tadc={}", self.id, padc, tadc);

        Ok((self.coefficients.pressure(padc, tadc), temperature_from_adc(tadc)))
    }

    pub async fn pressure<B: I2c + Send>(&self, bus: &mut B) -> SensorResult<f32> {
        let (pressure, _) = self.pressure_and_temperature(bus).await?;
        Ok(pressure)
    }

    pub async fn temperature<B: I2c + Send>(&self, bus: &mut B) -> SensorResult<f32> {
        let (_, temperature) = self.pressure_and_temperature(bus).await?;
        Ok(temperature)
    }
}

#[async_trait]
impl<B> PressureSensor<B> for Mpl115a2
where
    B: I2c + Send,
{
    async fn init(&mut self, bus: &mut B) -> SensorResult<()> {
        let mut buf = [0u8; 8];
        bus.write_read(self.address, &[REG_A0_COEFF_MSB], &mut buf)
            .map_err(|e| SensorError::i2c(&self.id, e))?;
        self.coefficients = Coefficients::from_bytes(&buf);
        debug!("[{}] coefficients: {:?}", self.id, self.coefficients);
        Ok(())
    }

    async fn read_raw(&mut self, bus: &mut B) -> SensorResult<f32> {
        self.pressure(bus).await
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::MPL115A2_ADDRESS;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    // Datasheet example: a0 = 2009.75, b1 = -2.37585, b2 = -0.92047, c12 = 0.000790
    const COEFF_BYTES: [u8; 8] = [0x3E, 0xCE, 0xB3, 0xF9, 0xC5, 0x17, 0x33, 0xC8];
    // Padc = 0x6680 >> 6 = 410, Tadc = 0x7EC0 >> 6 = 507
    const ADC_BYTES: [u8; 4] = [0x66, 0x80, 0x7E, 0xC0];

    fn init_transaction() -> I2cTransaction {
        I2cTransaction::write_read(MPL115A2_ADDRESS, vec![REG_A0_COEFF_MSB], COEFF_BYTES.to_vec())
    }

    fn conversion_transactions() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(MPL115A2_ADDRESS, vec![REG_START_CONVERSION, 0x00]),
            I2cTransaction::write_read(MPL115A2_ADDRESS, vec![REG_PADC_MSB], ADC_BYTES.to_vec()),
        ]
    }

    #[test]
    fn test_coefficient_decoding() {
        let c = Coefficients::from_bytes(&COEFF_BYTES);
        assert_eq!(c.a0, 2009.75);
        assert!((c.b1 + 2.37585).abs() < 1e-5);
        assert!((c.b2 + 0.92047).abs() < 1e-5);
        assert!((c.c12 - 0.000790).abs() < 1e-6);
    }

    #[test]
    fn test_compensation_matches_datasheet() {
        let c = Coefficients::from_bytes(&COEFF_BYTES);
        let pressure = c.pressure(410, 507);
        assert!((pressure - 96.587).abs() < 0.01, "pressure = {}", pressure);
        assert!((temperature_from_adc(507) - 23.318).abs() < 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_and_read() {
        let mut expectations = vec![init_transaction()];
        expectations.extend(conversion_transactions());
        expectations.extend(conversion_transactions());
        let mut bus = I2cMock::new(&expectations);
        let mut sensor = Mpl115a2::new("baro".to_string(), MPL115A2_ADDRESS);

        sensor.init(&mut bus).await.unwrap();
        assert_eq!(sensor.coefficients, Coefficients::from_bytes(&COEFF_BYTES));

        let pressure = sensor.read_raw(&mut bus).await.unwrap();
        assert!((pressure - 96.587).abs() < 0.01);

        let temperature = sensor.temperature(&mut bus).await.unwrap();
        assert!((temperature - 23.318).abs() < 0.01);
        bus.done();
    }

    #[tokio::test(start_paused = true)]
    async fn test_uninitialized_reads_offset_only() {
        // Without coefficients only the 50 kPa offset of the transfer function remains
        let mut bus = I2cMock::new(&conversion_transactions());
        let mut sensor = Mpl115a2::new("baro".to_string(), MPL115A2_ADDRESS);

        let pressure = sensor.read_raw(&mut bus).await.unwrap();
        assert_eq!(pressure, 50.0);
        bus.done();
    }

    #[tokio::test(start_paused = true)]
    async fn test_bus_error_is_reported() {
        let mut bus = I2cMock::new(&[
            I2cTransaction::write(MPL115A2_ADDRESS, vec![REG_START_CONVERSION, 0x00])
                .with_error(ErrorKind::NoAcknowledge(embedded_hal::i2c::NoAcknowledgeSource::Address)),
        ]);
        let mut sensor = Mpl115a2::new("baro".to_string(), MPL115A2_ADDRESS);

        let err = sensor.read_raw(&mut bus).await.unwrap_err();
        assert!(matches!(err, SensorError::I2cError { .. }));
        bus.done();
    }
}
