use chrono::NaiveDateTime;

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct HourlyAggregateDao {
    pub(crate) hour_start: NaiveDateTime,
    pub(crate) avg_temp: Option<f64>,
    pub(crate) avg_humidity: Option<f64>,
    pub(crate) avg_vpd: Option<f64>,
    pub(crate) avg_soil_moisture: Option<f64>,
    pub(crate) avg_co2: Option<f64>,
    pub(crate) min_temp: Option<f64>,
    pub(crate) max_temp: Option<f64>,
    pub(crate) light_uptime_pct: Option<f64>,
    pub(crate) heat_uptime_pct: Option<f64>,
}

/// At most one row per hour_start; the aggregation job probes before writing.
pub async fn exists(conn: &sqlx::PgPool, hour_start: NaiveDateTime) -> Result<bool, DBError> {
    let record = sqlx::query_as::<_, CountRecord>(
        "SELECT count(*) as count FROM hourly_aggregates WHERE hour_start = $1",
    )
    .bind(hour_start)
    .fetch_one(conn)
    .await?;
    Ok(record.count() > 0)
}

pub async fn insert(conn: &sqlx::PgPool, aggregate: &HourlyAggregateDao) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO hourly_aggregates
            (hour_start, avg_temp, avg_humidity, avg_vpd, avg_soil_moisture, avg_co2,
             min_temp, max_temp, light_uptime_pct, heat_uptime_pct)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
    )
    .bind(aggregate.hour_start)
    .bind(aggregate.avg_temp)
    .bind(aggregate.avg_humidity)
    .bind(aggregate.avg_vpd)
    .bind(aggregate.avg_soil_moisture)
    .bind(aggregate.avg_co2)
    .bind(aggregate.min_temp)
    .bind(aggregate.max_temp)
    .bind(aggregate.light_uptime_pct)
    .bind(aggregate.heat_uptime_pct)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_since(
    conn: &sqlx::PgPool,
    since: NaiveDateTime,
) -> Result<Vec<HourlyAggregateDao>, DBError> {
    Ok(sqlx::query_as::<_, HourlyAggregateDao>(
        "SELECT * FROM hourly_aggregates WHERE hour_start >= $1 ORDER BY hour_start ASC",
    )
    .bind(since)
    .fetch_all(conn)
    .await?)
}
