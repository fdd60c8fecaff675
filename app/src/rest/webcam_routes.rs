use chrono::Utc;
use std::sync::Arc;
use warp::http::Uri;
use warp::{Filter, Reply};

use super::query::LimitQuery;
use super::{build_no_data_response, build_response};
use crate::error::ApiError;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    latest_frame(observer.clone())
        .or(list_frames(observer.clone()))
        .or(og_image(observer.clone()))
}

/// GET /api/webcam/latest
///
/// Most recent stored frame with signed and public URLs
#[utoipa::path(
    get,
    path = "/api/webcam/latest",
    tag = "webcam",
    responses(
        (status = 200, description = "Latest frame URLs, or a JSON error when nothing is stored", body = dto::WebcamLatestDto)
    )
)]
pub(crate) fn latest_frame(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "webcam" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            match observer.webcam_latest().await {
                Ok(frame) => build_response(Ok(dto::WebcamLatestDto {
                    path: frame.path,
                    signed_url: frame.signed_url,
                    public_url: frame.public_url,
                    timestamp: Utc::now().naive_utc(),
                })),
                // storage trouble is reported to the caller, never a 5xx
                Err(err) => {
                    build_no_data_response(&format!("Failed to get webcam URL: {}", err))
                }
            }
        })
        .boxed()
}

/// GET /api/webcam/frames?limit=100
///
/// Stored frames, newest first; each signed best-effort
#[utoipa::path(
    get,
    path = "/api/webcam/frames",
    tag = "webcam",
    params(("limit" = Option<i64>, Query, description = "Maximum frames to list, 1 to 1000")),
    responses(
        (status = 200, description = "Frame listing", body = dto::FramesDto),
        (status = 400, description = "Limit out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn list_frames(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "webcam" / "frames"))
        .and(warp::query::<LimitQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: LimitQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                match observer.webcam_frames(query.limit() as usize).await {
                    Ok(frames) => {
                        let frames: Vec<dto::FrameDto> =
                            frames.into_iter().map(dto::FrameDto::from).collect();
                        build_response(Ok(dto::FramesDto {
                            count: frames.len(),
                            frames,
                        }))
                    }
                    Err(err) => {
                        build_no_data_response(&format!("Failed to list frames: {}", err))
                    }
                }
            },
        )
        .boxed()
}

/// GET /api/webcam/og-image
///
/// Redirects to a long-lived signed URL for the latest frame, falling back
/// to the upstream webcam endpoint. Always a redirect, never an error.
#[utoipa::path(
    get,
    path = "/api/webcam/og-image",
    tag = "webcam",
    responses(
        (status = 302, description = "Redirect to the current webcam image")
    )
)]
pub(crate) fn og_image(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "webcam" / "og-image"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let location = observer.og_image_location().await;
            let uri = location
                .parse::<Uri>()
                .unwrap_or_else(|_| Uri::from_static("/"));
            let reply: Result<Box<dyn Reply>, warp::Rejection> =
                Ok(Box::new(warp::redirect::found(uri)));
            reply
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

    use crate::observer::SignedFrame;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct WebcamLatestDto {
        pub path: String,
        pub signed_url: String,
        pub public_url: String,
        pub timestamp: NaiveDateTime,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct FrameDto {
        pub path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub signed_url: Option<String>,
        pub size: Option<u64>,
        pub updated: Option<String>,
    }

    impl From<SignedFrame> for FrameDto {
        fn from(val: SignedFrame) -> Self {
            FrameDto {
                path: val.path,
                signed_url: val.signed_url,
                size: val.size,
                updated: val.updated,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct FramesDto {
        pub frames: Vec<FrameDto>,
        pub count: usize,
    }
}
