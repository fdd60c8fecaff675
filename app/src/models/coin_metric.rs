use chrono::{NaiveDateTime, Utc};
use verdant_core::CoinMessage;

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CoinMetricDao {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) market_cap: Option<f64>,
    pub(crate) usd_market_cap: Option<f64>,
    pub(crate) holders: Option<i32>,
    pub(crate) replies: Option<i32>,
    pub(crate) ath_market_cap: Option<f64>,
    pub(crate) price: Option<f64>,
    pub(crate) volume_24h: Option<f64>,
}

pub async fn insert(conn: &sqlx::PgPool, msg: &CoinMessage) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO coin_metrics
            (timestamp, market_cap, usd_market_cap, holders, replies, ath_market_cap, price, volume_24h)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
    )
    .bind(Utc::now().naive_utc())
    .bind(msg.market_cap)
    .bind(msg.usd_market_cap)
    .bind(msg.holder_count)
    .bind(msg.reply_count)
    .bind(msg.ath_market_cap)
    .bind(msg.price)
    .bind(msg.volume_24h)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_latest(conn: &sqlx::PgPool) -> Result<Option<CoinMetricDao>, DBError> {
    Ok(sqlx::query_as::<_, CoinMetricDao>(
        "SELECT * FROM coin_metrics ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

pub async fn get_since(
    conn: &sqlx::PgPool,
    since: NaiveDateTime,
) -> Result<Vec<CoinMetricDao>, DBError> {
    Ok(sqlx::query_as::<_, CoinMetricDao>(
        "SELECT * FROM coin_metrics WHERE timestamp >= $1 ORDER BY timestamp ASC",
    )
    .bind(since)
    .fetch_all(conn)
    .await?)
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    Ok(
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM coin_metrics")
            .fetch_one(conn)
            .await?
            .count(),
    )
}
