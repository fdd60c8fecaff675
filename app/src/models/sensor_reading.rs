use chrono::{NaiveDateTime, Utc};
use verdant_core::SensorValues;

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SensorReadingDao {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) air_temp: Option<f64>,
    pub(crate) humidity: Option<f64>,
    pub(crate) vpd: Option<f64>,
    pub(crate) soil_moisture: Option<f64>,
    pub(crate) co2: Option<f64>,
    pub(crate) leaf_temp_delta: Option<f64>,
}

impl From<SensorReadingDao> for SensorValues {
    fn from(val: SensorReadingDao) -> Self {
        SensorValues {
            air_temp: val.air_temp,
            humidity: val.humidity,
            vpd: val.vpd,
            soil_moisture: val.soil_moisture,
            co2: val.co2,
            leaf_temp_delta: val.leaf_temp_delta,
        }
    }
}

pub async fn insert(conn: &sqlx::PgPool, values: &SensorValues) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO sensor_readings
            (timestamp, air_temp, humidity, vpd, soil_moisture, co2, leaf_temp_delta)
            VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(Utc::now().naive_utc())
    .bind(values.air_temp)
    .bind(values.humidity)
    .bind(values.vpd)
    .bind(values.soil_moisture)
    .bind(values.co2)
    .bind(values.leaf_temp_delta)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_latest(conn: &sqlx::PgPool) -> Result<Option<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        "SELECT * FROM sensor_readings ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

/// READ sensor_readings since a point in time, oldest first
pub async fn get_since(
    conn: &sqlx::PgPool,
    since: NaiveDateTime,
) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        "SELECT * FROM sensor_readings WHERE timestamp >= $1 ORDER BY timestamp ASC",
    )
    .bind(since)
    .fetch_all(conn)
    .await?)
}

/// READ sensor_readings within `start <= timestamp < end`, oldest first
pub async fn get_range(
    conn: &sqlx::PgPool,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        "SELECT * FROM sensor_readings WHERE timestamp >= $1 AND timestamp < $2 ORDER BY timestamp ASC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?)
}

/// READ the newest `limit` sensor_readings, newest first
pub async fn get_recent(
    conn: &sqlx::PgPool,
    limit: i64,
) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(
        "SELECT * FROM sensor_readings ORDER BY timestamp DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?)
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    Ok(
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM sensor_readings")
            .fetch_one(conn)
            .await?
            .count(),
    )
}

#[derive(sqlx::FromRow)]
struct TimeRangeRecord {
    oldest: Option<NaiveDateTime>,
    newest: Option<NaiveDateTime>,
}

pub async fn time_range(
    conn: &sqlx::PgPool,
) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), DBError> {
    let record = sqlx::query_as::<_, TimeRangeRecord>(
        "SELECT min(timestamp) as oldest, max(timestamp) as newest FROM sensor_readings",
    )
    .fetch_one(conn)
    .await?;
    Ok((record.oldest, record.newest))
}
