use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the polled sensor signals.
/// Fields absent from the enclosure's response stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorValues {
    pub air_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub vpd: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub co2: Option<f64>,
    pub leaf_temp_delta: Option<f64>,
}

/// On/off state of the six controlled devices.
/// Flags absent from the enclosure's response stay off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFlags {
    #[serde(default)]
    pub grow_light: bool,
    #[serde(default)]
    pub heat_mat: bool,
    #[serde(default)]
    pub circulation_fan: bool,
    #[serde(default)]
    pub exhaust_fan: bool,
    #[serde(default)]
    pub water_pump: bool,
    #[serde(default)]
    pub humidifier: bool,
}

/// The status document exchanged with the enclosure: polled from the remote
/// status endpoint and republished verbatim-shaped over FTP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sol_day: Option<i32>,
    #[serde(default)]
    pub verdant_output: String,
    #[serde(default)]
    pub sensors: SensorValues,
    #[serde(default)]
    pub devices: DeviceFlags,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_partial_status() {
        let msg: StatusMessage = serde_json::from_str(
            r#"{"sensors":{"air_temp":25.0,"humidity":60},"devices":{"grow_light":true}}"#,
        )
        .unwrap();

        assert_eq!(msg.sensors.air_temp, Some(25.0));
        assert_eq!(msg.sensors.humidity, Some(60.0));
        assert_eq!(msg.sensors.co2, None);
        assert!(msg.devices.grow_light);
        assert!(!msg.devices.heat_mat);
        assert!(!msg.devices.humidifier);
        assert_eq!(msg.verdant_output, "");
        assert_eq!(msg.sol_day, None);
    }

    #[test]
    fn parse_full_status() {
        let msg: StatusMessage = serde_json::from_str(
            r#"{
                "timestamp": "2026-01-05T12:00:00Z",
                "sol_day": 42,
                "verdant_output": "Sol is thriving",
                "sensors": {
                    "air_temp": 24.5, "humidity": 65.0, "vpd": 0.85,
                    "soil_moisture": 72.0, "co2": 850.0, "leaf_temp_delta": -1.2
                },
                "devices": {
                    "grow_light": true, "heat_mat": false, "circulation_fan": true,
                    "exhaust_fan": false, "water_pump": false, "humidifier": true
                }
            }"#,
        )
        .unwrap();

        assert_eq!(msg.sol_day, Some(42));
        assert_eq!(msg.sensors.leaf_temp_delta, Some(-1.2));
        assert!(msg.devices.circulation_fan);
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn empty_body_defaults() {
        let msg: StatusMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(msg, StatusMessage::default());
    }
}
