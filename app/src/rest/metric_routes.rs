use std::sync::Arc;
use warp::Filter;

use super::build_response;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health().or(stats(observer.clone()))
}

/// GET /health
///
/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "metrics",
    responses(
        (status = 200, description = "Service is up", body = dto::HealthyDto)
    )
)]
pub(crate) fn health() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
{
    warp::path!("health")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&dto::HealthyDto {
                status: "healthy".to_owned(),
            })
        })
        .boxed()
}

/// GET /api/stats
///
/// Row counts per family and the sensor-data time range
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "metrics",
    responses(
        (status = 200, description = "Store statistics", body = dto::StatsDto)
    )
)]
pub(crate) fn stats(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "stats"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer.stats().await.map(dto::StatsDto::from);
            build_response(resp)
        })
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use chrono::NaiveDateTime;
    use serde::Serialize;
    use utoipa::ToSchema;

    use crate::observer::StoreStats;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct HealthyDto {
        pub status: String,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct TotalRecordsDto {
        pub sensor_readings: i64,
        pub device_states: i64,
        pub coin_metrics: i64,
        pub ai_outputs: i64,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct DataRangeDto {
        pub oldest: Option<NaiveDateTime>,
        pub newest: Option<NaiveDateTime>,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct StatsDto {
        pub total_records: TotalRecordsDto,
        pub data_range: DataRangeDto,
    }

    impl From<StoreStats> for StatsDto {
        fn from(val: StoreStats) -> Self {
            StatsDto {
                total_records: TotalRecordsDto {
                    sensor_readings: val.sensor_readings,
                    device_states: val.device_states,
                    coin_metrics: val.coin_metrics,
                    ai_outputs: val.ai_outputs,
                },
                data_range: DataRangeDto {
                    oldest: val.oldest,
                    newest: val.newest,
                },
            }
        }
    }
}
