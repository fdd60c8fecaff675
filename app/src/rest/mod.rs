use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::config::CONFIG;
use crate::error::ObserverError;
use crate::observer::ConcurrentObserver;

mod analytics_routes;
mod coin_routes;
mod doc_routes;
mod engagement_routes;
mod metric_routes;
pub(crate) mod query;
mod sensor_routes;
mod webcam_routes;

#[cfg(test)]
mod test;

#[derive(OpenApi)]
#[openapi(
    paths(
        metric_routes::health,
        metric_routes::stats,
        sensor_routes::latest_sensors,
        sensor_routes::sensor_history,
        sensor_routes::latest_devices,
        sensor_routes::device_history,
        sensor_routes::latest_ai_output,
        sensor_routes::hourly_aggregates,
        coin_routes::latest_coin,
        coin_routes::coin_history,
        analytics_routes::trends,
        analytics_routes::predictions,
        engagement_routes::add_like,
        engagement_routes::like_count,
        engagement_routes::export_likes,
        webcam_routes::latest_frame,
        webcam_routes::list_frames,
        webcam_routes::og_image,
    ),
    components(schemas(
        dto::ErrorResponseDto,
        metric_routes::dto::HealthyDto,
        metric_routes::dto::StatsDto,
        metric_routes::dto::TotalRecordsDto,
        metric_routes::dto::DataRangeDto,
        sensor_routes::dto::SensorReadingDto,
        sensor_routes::dto::DeviceStateDto,
        sensor_routes::dto::AiOutputDto,
        sensor_routes::dto::HourlyAggregateDto,
        coin_routes::dto::CoinMetricDto,
        coin_routes::dto::CoinHistoryDto,
        crate::analytics::TrendsReport,
        crate::analytics::SignalTrend,
        crate::analytics::Trend,
        crate::analytics::TrendDirection,
        crate::analytics::PredictionReport,
        crate::analytics::PredictedSignals,
        crate::analytics::Confidence,
        engagement_routes::dto::LikeResponseDto,
        engagement_routes::dto::LikeCountDto,
        engagement_routes::dto::LikeEventDto,
        engagement_routes::dto::LikeExportDto,
        webcam_routes::dto::WebcamLatestDto,
        webcam_routes::dto::FrameDto,
        webcam_routes::dto::FramesDto,
    )),
    tags(
        (name = "metrics", description = "Liveness and store statistics"),
        (name = "sensors", description = "Sensor, device and AI telemetry"),
        (name = "coin", description = "Coin metrics"),
        (name = "analytics", description = "Trend and prediction heuristics"),
        (name = "engagement", description = "Like counter"),
        (name = "webcam", description = "Webcam frames"),
    )
)]
pub(crate) struct ApiDoc;

pub(crate) fn build_response<T: serde::Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<Box<dyn Reply>, warp::Rejection> {
    match resp {
        Ok(data) => Ok(Box::new(warp::reply::json(&data))),
        Err(ObserverError::User(err)) => {
            warn!("{}", err);
            let body = warp::reply::json(&dto::ErrorResponseDto {
                error: format!("{}", err),
            });
            Ok(Box::new(warp::reply::with_status(
                body,
                StatusCode::BAD_REQUEST,
            )))
        }
        Err(ObserverError::Internal(err)) => {
            error!("{}", err);
            Ok(Box::new(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// Answers `200` with a JSON error body: the store cannot satisfy the
/// request yet (empty table, too little data, no stored frame).
pub(crate) fn build_no_data_response(message: &str) -> Result<Box<dyn Reply>, warp::Rejection> {
    Ok(Box::new(warp::reply::json(&dto::ErrorResponseDto {
        error: message.to_owned(),
    })))
}

pub(crate) fn build_latest_response<T: serde::Serialize>(
    resp: Result<Option<T>, ObserverError>,
) -> Result<Box<dyn Reply>, warp::Rejection> {
    match resp {
        Ok(Some(data)) => build_response(Ok(data)),
        Ok(None) => build_no_data_response("No data"),
        Err(err) => build_response::<T>(Err(err)),
    }
}

pub mod dto {
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct ErrorResponseDto {
        pub error: String,
    }
}

pub async fn dispatch_server(observer: Arc<ConcurrentObserver>) {
    let port: u16 = CONFIG
        .server_port()
        .parse()
        .expect("SERVER_PORT must be a port number");

    let routes = metric_routes::routes(&observer)
        .or(sensor_routes::routes(&observer))
        .or(coin_routes::routes(&observer))
        .or(analytics_routes::routes(&observer))
        .or(engagement_routes::routes(&observer))
        .or(webcam_routes::routes(&observer))
        .or(doc_routes::swagger());

    info!("Starting webserver at: 0.0.0.0:{}", port);
    warp::serve(routes.with(warp::log("verdant::rest")))
        .run(([0, 0, 0, 0], port))
        .await;
}
