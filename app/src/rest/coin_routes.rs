use std::sync::Arc;
use warp::Filter;

use super::query::HoursQuery;
use super::{build_latest_response, build_response};
use crate::error::ApiError;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    latest_coin(observer.clone()).or(coin_history(observer.clone()))
}

/// GET /api/coin/latest
///
/// Most recent coin metrics snapshot
#[utoipa::path(
    get,
    path = "/api/coin/latest",
    tag = "coin",
    responses(
        (status = 200, description = "Latest coin metrics, or a JSON error when the table is empty", body = dto::CoinMetricDto)
    )
)]
pub(crate) fn latest_coin(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "coin" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .latest_coin_metric()
                .await
                .map(|opt| opt.map(dto::CoinMetricDto::from));
            build_latest_response(resp)
        })
        .boxed()
}

/// GET /api/coin/history?hours=24
///
/// Coin metrics of the lookback window, timestamp ascending.
/// History rows carry a reduced field set without all-time-high and volume.
#[utoipa::path(
    get,
    path = "/api/coin/history",
    tag = "coin",
    params(("hours" = Option<i64>, Query, description = "Lookback window in hours, 1 to 720")),
    responses(
        (status = 200, description = "Coin metrics in the window", body = [dto::CoinHistoryDto]),
        (status = 400, description = "Lookback window out of bounds", body = super::dto::ErrorResponseDto)
    )
)]
pub(crate) fn coin_history(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "coin" / "history"))
        .and(warp::query::<HoursQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, query: HoursQuery| async move {
                if !query.is_valid() {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer.coin_history(query.hours()).await.map(|rows| {
                    rows.into_iter()
                        .map(dto::CoinHistoryDto::from)
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

    use crate::models::coin_metric::CoinMetricDao;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct CoinMetricDto {
        pub timestamp: NaiveDateTime,
        pub market_cap: Option<f64>,
        pub usd_market_cap: Option<f64>,
        pub holders: Option<i32>,
        pub replies: Option<i32>,
        pub ath_market_cap: Option<f64>,
        pub price: Option<f64>,
        pub volume_24h: Option<f64>,
    }

    impl From<CoinMetricDao> for CoinMetricDto {
        fn from(val: CoinMetricDao) -> Self {
            CoinMetricDto {
                timestamp: val.timestamp,
                market_cap: val.market_cap,
                usd_market_cap: val.usd_market_cap,
                holders: val.holders,
                replies: val.replies,
                ath_market_cap: val.ath_market_cap,
                price: val.price,
                volume_24h: val.volume_24h,
            }
        }
    }

    #[derive(Debug, Serialize, ToSchema)]
    pub struct CoinHistoryDto {
        pub timestamp: NaiveDateTime,
        pub market_cap: Option<f64>,
        pub usd_market_cap: Option<f64>,
        pub holders: Option<i32>,
        pub replies: Option<i32>,
        pub price: Option<f64>,
    }

    impl From<CoinMetricDao> for CoinHistoryDto {
        fn from(val: CoinMetricDao) -> Self {
            CoinHistoryDto {
                timestamp: val.timestamp,
                market_cap: val.market_cap,
                usd_market_cap: val.usd_market_cap,
                holders: val.holders,
                replies: val.replies,
                price: val.price,
            }
        }
    }
}
