use chrono::{Duration, DurationRound, NaiveDateTime, Utc};
use tracing::info;

use super::ConcurrentObserver;
use crate::error::ObserverError;
use crate::models::device_state::{self, DeviceStateDao};
use crate::models::hourly_aggregate::{self, HourlyAggregateDao};
use crate::models::sensor_reading::{self, SensorReadingDao};

impl ConcurrentObserver {
    /// Aggregates the most recently completed hour, never the running one.
    /// A second invocation for the same hour is a no-op.
    pub(crate) async fn aggregate_last_hour(
        &self,
    ) -> Result<Option<NaiveDateTime>, ObserverError> {
        let now = Utc::now().naive_utc();
        let hour_start = now
            .duration_trunc(Duration::hours(1))
            .expect("hour truncation is in range")
            - Duration::hours(1);
        let hour_end = hour_start + Duration::hours(1);

        if hourly_aggregate::exists(&self.db_conn, hour_start).await? {
            return Ok(None);
        }

        let readings = sensor_reading::get_range(&self.db_conn, hour_start, hour_end).await?;
        let devices = device_state::get_range(&self.db_conn, hour_start, hour_end).await?;

        let aggregate = match summarize_hour(hour_start, &readings, &devices) {
            Some(aggregate) => aggregate,
            None => return Ok(None),
        };
        hourly_aggregate::insert(&self.db_conn, &aggregate).await?;

        info!(hour_start = %hour_start, "Computed hourly aggregate");
        Ok(Some(hour_start))
    }
}

/// Rolls one hour of raw rows into a summary. Hours without any sensor
/// reading yield no aggregate at all.
pub(crate) fn summarize_hour(
    hour_start: NaiveDateTime,
    readings: &[SensorReadingDao],
    devices: &[DeviceStateDao],
) -> Option<HourlyAggregateDao> {
    if readings.is_empty() {
        return None;
    }

    let temps: Vec<f64> = readings.iter().filter_map(|r| r.air_temp).collect();
    let humidities: Vec<f64> = readings.iter().filter_map(|r| r.humidity).collect();
    let vpds: Vec<f64> = readings.iter().filter_map(|r| r.vpd).collect();
    let soils: Vec<f64> = readings.iter().filter_map(|r| r.soil_moisture).collect();
    let co2s: Vec<f64> = readings.iter().filter_map(|r| r.co2).collect();

    // floor 1 so an hour without device rows reports 0%, not an error
    let device_total = devices.len().max(1) as f64;
    let light_uptime = devices.iter().filter(|d| d.grow_light).count() as f64 / device_total * 100.0;
    let heat_uptime = devices.iter().filter(|d| d.heat_mat).count() as f64 / device_total * 100.0;

    Some(HourlyAggregateDao {
        hour_start,
        avg_temp: mean(&temps),
        avg_humidity: mean(&humidities),
        avg_vpd: mean(&vpds),
        avg_soil_moisture: mean(&soils),
        avg_co2: mean(&co2s),
        min_temp: temps.iter().copied().reduce(f64::min),
        max_temp: temps.iter().copied().reduce(f64::max),
        light_uptime_pct: Some(light_uptime),
        heat_uptime_pct: Some(heat_uptime),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hour() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn reading(air_temp: Option<f64>, humidity: Option<f64>) -> SensorReadingDao {
        SensorReadingDao {
            timestamp: hour(),
            air_temp,
            humidity,
            vpd: None,
            soil_moisture: None,
            co2: None,
            leaf_temp_delta: None,
        }
    }

    fn device(grow_light: bool, heat_mat: bool) -> DeviceStateDao {
        DeviceStateDao {
            timestamp: hour(),
            grow_light,
            heat_mat,
            circulation_fan: false,
            exhaust_fan: false,
            water_pump: false,
            humidifier: false,
        }
    }

    #[test]
    fn silent_hour_yields_no_aggregate() {
        assert!(summarize_hour(hour(), &[], &[device(true, true)]).is_none());
    }

    #[test]
    fn means_ignore_nulls() {
        let readings = vec![
            reading(Some(20.0), None),
            reading(Some(24.0), Some(60.0)),
            reading(None, Some(70.0)),
        ];
        let aggregate = summarize_hour(hour(), &readings, &[]).unwrap();

        assert_eq!(aggregate.avg_temp, Some(22.0));
        assert_eq!(aggregate.avg_humidity, Some(65.0));
        assert_eq!(aggregate.avg_vpd, None);
        assert_eq!(aggregate.min_temp, Some(20.0));
        assert_eq!(aggregate.max_temp, Some(24.0));
    }

    #[test]
    fn uptime_without_device_rows_is_zero() {
        let readings = vec![reading(Some(20.0), None)];
        let aggregate = summarize_hour(hour(), &readings, &[]).unwrap();

        assert_eq!(aggregate.light_uptime_pct, Some(0.0));
        assert_eq!(aggregate.heat_uptime_pct, Some(0.0));
    }

    #[test]
    fn uptime_percentages_stay_in_bounds() {
        let devices = vec![
            device(true, false),
            device(true, true),
            device(false, false),
            device(true, false),
        ];
        let readings = vec![reading(Some(20.0), None)];
        let aggregate = summarize_hour(hour(), &readings, &devices).unwrap();

        assert_eq!(aggregate.light_uptime_pct, Some(75.0));
        assert_eq!(aggregate.heat_uptime_pct, Some(25.0));

        let all_on = vec![device(true, true); 3];
        let aggregate = summarize_hour(hour(), &readings, &all_on).unwrap();
        assert_eq!(aggregate.light_uptime_pct, Some(100.0));
        assert_eq!(aggregate.heat_uptime_pct, Some(100.0));
    }
}
