use std::sync::Arc;
use warp::Filter;

use super::query::{HorizonQuery, HoursQuery};
use super::{build_no_data_response, build_response};
use crate::error::ApiError;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    trends(observer.clone()).or(predictions(observer.clone()))
}

/// GET /api/analytics/trends?hours=24
///
/// Per-signal trend classification over the lookback window
#[utoipa::path(
    get,
    path = "/api/analytics/trends",
    tag = "analytics",
    params(("hours" = Option<i64>, Query, description = "Lookback window in hours, 1 to 720")),
    responses(
        (status = 200, description = "Trend report, or a JSON error below two readings", body = crate::analytics::TrendsReport),
        (status = 400, description = "Lookback window out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn trends(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "analytics" / "trends"))
        .and(warp::query::<HoursQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HoursQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                match observer.trends_report(query.hours()).await {
                    Ok(Some(report)) => build_response(Ok(report)),
                    Ok(None) => build_no_data_response("Not enough data for trends"),
                    Err(err) => build_response::<()>(Err(err)),
                }
            },
        )
        .boxed()
}

/// GET /api/analytics/predictions?hours_ahead=6
///
/// Linear extrapolation of the newest readings. An intentionally naive
/// heuristic, never a validated forecast.
#[utoipa::path(
    get,
    path = "/api/analytics/predictions",
    tag = "analytics",
    params(("hours_ahead" = Option<i64>, Query, description = "Look-ahead in hours, 1 to 24")),
    responses(
        (status = 200, description = "Prediction report, or a JSON error below ten readings", body = crate::analytics::PredictionReport),
        (status = 400, description = "Look-ahead out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn predictions(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "analytics" / "predictions"))
        .and(warp::query::<HorizonQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HorizonQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                match observer.prediction_report(query.hours_ahead()).await {
                    Ok(Some(report)) => build_response(Ok(report)),
                    Ok(None) => {
                        build_no_data_response("Not enough historical data for predictions")
                    }
                    Err(err) => build_response::<()>(Err(err)),
                }
            },
        )
        .boxed()
}
