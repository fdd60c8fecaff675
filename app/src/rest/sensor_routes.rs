use std::sync::Arc;
use warp::Filter;

use super::query::HoursQuery;
use super::{build_latest_response, build_response};
use crate::error::ApiError;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    latest_sensors(observer.clone())
        .or(sensor_history(observer.clone()))
        .or(latest_devices(observer.clone()))
        .or(device_history(observer.clone()))
        .or(latest_ai_output(observer.clone()))
        .or(hourly_aggregates(observer.clone()))
}

/// GET /api/sensors/latest
///
/// Most recent sensor reading
#[utoipa::path(
    get,
    path = "/api/sensors/latest",
    tag = "sensors",
    responses(
        (status = 200, description = "Latest sensor reading, or a JSON error when the table is empty", body = dto::SensorReadingDto)
    )
)]
pub(crate) fn latest_sensors(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "sensors" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .latest_sensor_reading()
                .await
                .map(|opt| opt.map(dto::SensorReadingDto::from));
            build_latest_response(resp)
        })
        .boxed()
}

/// GET /api/sensors/history?hours=24
///
/// Sensor readings of the lookback window, timestamp ascending
#[utoipa::path(
    get,
    path = "/api/sensors/history",
    tag = "sensors",
    params(("hours" = Option<i64>, Query, description = "Lookback window in hours, 1 to 720")),
    responses(
        (status = 200, description = "Readings in the window", body = [dto::SensorReadingDto]),
        (status = 400, description = "Lookback window out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn sensor_history(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "sensors" / "history"))
        .and(warp::query::<HoursQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HoursQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer.sensor_history(query.hours()).await.map(|rows| {
                    rows.into_iter()
                        .map(dto::SensorReadingDto::from)
                        .collect::<Vec<_>>()
                });
                build_response(resp)
            },
        )
        .boxed()
}

/// GET /api/devices/latest
///
/// Most recent device state
#[utoipa::path(
    get,
    path = "/api/devices/latest",
    tag = "sensors",
    responses(
        (status = 200, description = "Latest device state, or a JSON error when the table is empty", body = dto::DeviceStateDto)
    )
)]
pub(crate) fn latest_devices(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "devices" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .latest_device_state()
                .await
                .map(|opt| opt.map(dto::DeviceStateDto::from));
            build_latest_response(resp)
        })
        .boxed()
}

/// GET /api/devices/history?hours=24
///
/// Device states of the lookback window, timestamp ascending
#[utoipa::path(
    get,
    path = "/api/devices/history",
    tag = "sensors",
    params(("hours" = Option<i64>, Query, description = "Lookback window in hours, 1 to 720")),
    responses(
        (status = 200, description = "Device states in the window", body = [dto::DeviceStateDto]),
        (status = 400, description = "Lookback window out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn device_history(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "devices" / "history"))
        .and(warp::query::<HoursQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HoursQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer.device_history(query.hours()).await.map(|rows| {
                    rows.into_iter()
                        .map(dto::DeviceStateDto::from)
                        .collect::<Vec<_>>()
                });
                build_response(resp)
            },
        )
        .boxed()
}

/// GET /api/ai/latest
///
/// Most recent AI output text
#[utoipa::path(
    get,
    path = "/api/ai/latest",
    tag = "sensors",
    responses(
        (status = 200, description = "Latest AI output, or a JSON error when the table is empty", body = dto::AiOutputDto)
    )
)]
pub(crate) fn latest_ai_output(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "ai" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .latest_ai_output()
                .await
                .map(|opt| opt.map(dto::AiOutputDto::from));
            build_latest_response(resp)
        })
        .boxed()
}

/// GET /api/aggregates/hourly?hours=24
///
/// Hourly aggregates of the lookback window, hour ascending
#[utoipa::path(
    get,
    path = "/api/aggregates/hourly",
    tag = "sensors",
    params(("hours" = Option<i64>, Query, description = "Lookback window in hours, 1 to 720")),
    responses(
        (status = 200, description = "Aggregates in the window", body = [dto::HourlyAggregateDto]),
        (status = 400, description = "Lookback window out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn hourly_aggregates(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "aggregates" / "hourly"))
        .and(warp::query::<HoursQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HoursQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer.hourly_aggregates(query.hours()).await.map(|rows| {
                    rows.into_iter()
                        .map(dto::HourlyAggregateDto::from)
                        .collect::<Vec<_>>()
                });
                build_response(resp)
            },
        )
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use chrono::NaiveDateTime;
    use serde::Serialize;
    use utoipa::ToSchema;

    use crate::models::ai_output::AiOutputDao;
    use crate::models::device_state::DeviceStateDao;
    use crate::models::hourly_aggregate::HourlyAggregateDao;
    use crate::models::sensor_reading::SensorReadingDao;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct SensorReadingDto {
        pub timestamp: NaiveDateTime,
        pub air_temp: Option<f64>,
        pub humidity: Option<f64>,
        pub vpd: Option<f64>,
        pub soil_moisture: Option<f64>,
        pub co2: Option<f64>,
        pub leaf_temp_delta: Option<f64>,
    }

    impl From<SensorReadingDao> for SensorReadingDto {
        fn from(val: SensorReadingDao) -> Self {
            SensorReadingDto {
                timestamp: val.timestamp,
                air_temp: val.air_temp,
                humidity: val.humidity,
                vpd: val.vpd,
                soil_moisture: val.soil_moisture,
                co2: val.co2,
                leaf_temp_delta: val.leaf_temp_delta,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct DeviceStateDto {
        pub timestamp: NaiveDateTime,
        pub grow_light: bool,
        pub heat_mat: bool,
        pub circulation_fan: bool,
        pub exhaust_fan: bool,
        pub water_pump: bool,
        pub humidifier: bool,
    }

    impl From<DeviceStateDao> for DeviceStateDto {
        fn from(val: DeviceStateDao) -> Self {
            DeviceStateDto {
                timestamp: val.timestamp,
                grow_light: val.grow_light,
                heat_mat: val.heat_mat,
                circulation_fan: val.circulation_fan,
                exhaust_fan: val.exhaust_fan,
                water_pump: val.water_pump,
                humidifier: val.humidifier,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct AiOutputDto {
        pub timestamp: NaiveDateTime,
        pub output_text: String,
        pub sol_day: Option<i32>,
    }

    impl From<AiOutputDao> for AiOutputDto {
        fn from(val: AiOutputDao) -> Self {
            AiOutputDto {
                timestamp: val.timestamp,
                output_text: val.output_text,
                sol_day: val.sol_day,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct HourlyAggregateDto {
        pub hour_start: NaiveDateTime,
        pub avg_temp: Option<f64>,
        pub avg_humidity: Option<f64>,
        pub avg_vpd: Option<f64>,
        pub avg_soil_moisture: Option<f64>,
        pub avg_co2: Option<f64>,
        pub min_temp: Option<f64>,
        pub max_temp: Option<f64>,
        pub light_uptime_pct: Option<f64>,
        pub heat_uptime_pct: Option<f64>,
    }

    impl From<HourlyAggregateDao> for HourlyAggregateDto {
        fn from(val: HourlyAggregateDao) -> Self {
            HourlyAggregateDto {
                hour_start: val.hour_start,
                avg_temp: val.avg_temp,
                avg_humidity: val.avg_humidity,
                avg_vpd: val.avg_vpd,
                avg_soil_moisture: val.avg_soil_moisture,
                avg_co2: val.avg_co2,
                min_temp: val.min_temp,
                max_temp: val.max_temp,
                light_uptime_pct: val.light_uptime_pct,
                heat_uptime_pct: val.heat_uptime_pct,
            }
        }
    }
}
