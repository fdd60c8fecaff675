use chrono::Utc;
use std::sync::Arc;
use warp::{Filter, Reply};

use super::build_response;
use super::query::LikeQuery;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    add_like(observer.clone())
        .or(like_count(observer.clone()))
        .or(export_likes(observer.clone()))
}

/// POST /api/engagement/like?message=
///
/// Appends one like event and returns the new total
#[utoipa::path(
    post,
    path = "/api/engagement/like",
    tag = "engagement",
    params(("message" = Option<String>, Query, description = "Optional message, empty stored as absent")),
    responses(
        (status = 200, description = "New like total", body = dto::LikeResponseDto)
    )
)]
pub(crate) fn add_like(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::post())
        .and(warp::path!("api" / "engagement" / "like"))
        .and(warp::query::<LikeQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: LikeQuery| async move {
                let resp = observer
                    .add_like(query.message())
                    .await
                    .map(|total| dto::LikeResponseDto {
                        success: true,
                        total_likes: total,
                    });
                build_response(resp)
            },
        )
        .boxed()
}

/// GET /api/engagement/count
///
/// Current like total
#[utoipa::path(
    get,
    path = "/api/engagement/count",
    tag = "engagement",
    responses(
        (status = 200, description = "Like total", body = dto::LikeCountDto)
    )
)]
pub(crate) fn like_count(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "engagement" / "count"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .like_count()
                .await
                .map(|total| dto::LikeCountDto { total_likes: total });
            build_response(resp)
        })
        .boxed()
}

/// GET /api/engagement/export
///
/// Every like event as JSON, with a download hint for the client
#[utoipa::path(
    get,
    path = "/api/engagement/export",
    tag = "engagement",
    responses(
        (status = 200, description = "All like events, oldest first", body = dto::LikeExportDto)
    )
)]
pub(crate) fn export_likes(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "engagement" / "export"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            match observer.export_likes().await {
                Ok(events) => {
                    let likes: Vec<dto::LikeEventDto> =
                        events.into_iter().map(dto::LikeEventDto::from).collect();
                    let body = dto::LikeExportDto {
                        total: likes.len(),
                        likes,
                        exported_at: Utc::now().naive_utc(),
                    };
                    let reply = warp::reply::with_header(
                        warp::reply::json(&body),
                        "Content-Disposition",
                        "attachment; filename=sol_likes.json",
                    );
                    Ok(Box::new(reply) as Box<dyn Reply>)
                }
                Err(err) => build_response::<()>(Err(err)),
            }
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

    use crate::models::like_event::LikeEventDao;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct LikeResponseDto {
        pub success: bool,
        pub total_likes: i64,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct LikeCountDto {
        pub total_likes: i64,
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct LikeEventDto {
        pub id: i32,
        pub timestamp: NaiveDateTime,
        pub source: Option<String>,
        pub message: Option<String>,
    }

    impl From<LikeEventDao> for LikeEventDto {
        fn from(val: LikeEventDao) -> Self {
            LikeEventDto {
                id: val.id,
                timestamp: val.timestamp,
                source: val.source,
                message: val.message,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct LikeExportDto {
        pub likes: Vec<LikeEventDto>,
        pub total: usize,
        pub exported_at: NaiveDateTime,
    }
}
