use serde::{Deserialize, Serialize};

/// Header metadata common to all published messages
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Header {
    /// Unique device identifier
    pub device_id: String,
    /// Sensor identifier (e.g., "depth0")
    pub sensor_id: String,
    /// Sequence number for message ordering
    pub seq: u64,
    /// UTC timestamp in nanoseconds
    pub t_utc_ns: u64,
    /// Message schema version for evolution
    pub schema_v: u16,
}

impl Header {
    /// Create a new header stamped with the current time
    pub fn new(device_id: String, sensor_id: String, seq: u64) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now_utc = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        Self {
            device_id,
            sensor_id,
            seq,
            t_utc_ns: now_utc,
            schema_v: 1,
        }
    }
}

/// One averaged reading of both pressure sensors
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PressureMessage {
    pub h: Header,
    /// Depth sensor pressure (mbar)
    pub pressure_1: f32,
    /// Barometer pressure, scaled to mbar
    pub pressure_2: f32,
    /// Calibration offset between the two (mbar), absent before calibration
    pub offset: Option<f32>,
    /// Depth below the surface (m)
    pub depth: f32,
    /// Water temperature (°C)
    pub temperature: f32,
    /// Depth sensor pressure as altitude above mean sea level (m)
    pub altitude: f32,
}

impl PressureMessage {
    /// Depth sensor pressure corrected onto the barometer's scale
    pub fn calibrated_pressure_1(&self) -> Option<f32> {
        self.offset.map(|offset| self.pressure_1 + offset)
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(offset: Option<f32>) -> PressureMessage {
        PressureMessage {
            h: Header::new("test".to_string(), "depth0".to_string(), 7),
            pressure_1: 1002.0,
            pressure_2: 1000.0,
            offset,
            depth: 0.1,
            temperature: 18.5,
            altitude: 94.0,
        }
    }

    #[test]
    fn test_header_creation() {
        let header = Header::new("test_device".to_string(), "depth0".to_string(), 42);

        assert_eq!(header.device_id, "test_device");
        assert_eq!(header.sensor_id, "depth0");
        assert_eq!(header.seq, 42);
        assert_eq!(header.schema_v, 1);
        assert!(header.t_utc_ns > 0);
    }

    #[test]
    fn test_calibrated_pressure() {
        assert_eq!(message(Some(-2.0)).calibrated_pressure_1(), Some(1000.0));
        assert_eq!(message(None).calibrated_pressure_1(), None);
    }

    #[test]
    fn test_json_is_single_line() {
        let json = message(Some(-2.0)).to_json().unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"depth0\""));
        assert!(json.contains("\"offset\":-2.0"));
        assert!(json.contains("\"altitude\":94.0"));

        let decoded: PressureMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.h.seq, 7);
        assert_eq!(decoded.pressure_1, 1002.0);
    }
}
