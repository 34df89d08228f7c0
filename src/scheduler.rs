use crate::messages::{Header, PressureMessage};
use crate::sensors::{DepthSensor, PressureSensor};
use crate::station::PressureStation;
use tokio::time::sleep;
use tracing::{debug, info};

pub const SENSOR_ID: &str = "pressure";

/// Take one averaged reading of both sensors
pub async fn sample_once<B, A, S>(
    station: &mut PressureStation<B, A, S>,
    device_id: &str,
    seq: u64,
) -> PressureMessage
where
    B: Send,
    A: DepthSensor<B>,
    S: PressureSensor<B>,
{
    let pressure_1 = station.get_pressure_1().await;
    let pressure_2 = station.get_pressure_2().await;

    PressureMessage {
        h: Header::new(device_id.to_string(), SENSOR_ID.to_string(), seq),
        pressure_1,
        pressure_2,
        offset: station.offset(),
        depth: station.depth(),
        temperature: station.temperature(),
        altitude: station.altitude(),
    }
}

/// Sample forever, handing each reading to `publish` and then waiting the
/// configured publish interval.
pub async fn run_publisher<B, A, S, F>(station: &mut PressureStation<B, A, S>, device_id: &str, mut publish: F)
where
    B: Send,
    A: DepthSensor<B>,
    S: PressureSensor<B>,
    F: FnMut(&PressureMessage),
{
    let interval = station.sampling().publish_interval();
    info!("[scheduler] publishing every {:?}", interval);

    let mut sequence_counter = 0u64;
    loop {
        sequence_counter += 1;
        let msg = sample_once(station, device_id, sequence_counter).await;
        debug!(
            "[scheduler] #{} p1={:.2} p2={:.2} depth={:.3}",
            sequence_counter, msg.pressure_1, msg.pressure_2, msg.depth
        );
        publish(&msg);
        sleep(interval).await;
    }
}
