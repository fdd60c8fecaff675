use chrono::Utc;
use verdant_core::{DeviceFlags, SensorValues};

use super::device_state::DeviceStateDao;
use super::sensor_reading::SensorReadingDao;
use super::*;

#[test]
fn count_record_defaults_to_zero() {
    let record = CountRecord { count: None };
    assert_eq!(record.count(), 0);

    let record = CountRecord { count: Some(42) };
    assert_eq!(record.count(), 42);
}

#[test]
fn sensor_dao_into_values() {
    let dao = SensorReadingDao {
        timestamp: Utc::now().naive_utc(),
        air_temp: Some(24.5),
        humidity: Some(65.0),
        vpd: None,
        soil_moisture: Some(72.0),
        co2: None,
        leaf_temp_delta: Some(-1.2),
    };

    let values: SensorValues = dao.into();
    assert_eq!(values.air_temp, Some(24.5));
    assert_eq!(values.vpd, None);
    assert_eq!(values.leaf_temp_delta, Some(-1.2));
}

#[test]
fn device_dao_into_flags() {
    let dao = DeviceStateDao {
        timestamp: Utc::now().naive_utc(),
        grow_light: true,
        heat_mat: false,
        circulation_fan: true,
        exhaust_fan: false,
        water_pump: false,
        humidifier: true,
    };

    let flags: DeviceFlags = dao.into();
    assert!(flags.grow_light);
    assert!(!flags.heat_mat);
    assert!(flags.humidifier);
}
