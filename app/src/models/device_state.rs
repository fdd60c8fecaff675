use chrono::{NaiveDateTime, Utc};
use verdant_core::DeviceFlags;

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DeviceStateDao {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) grow_light: bool,
    pub(crate) heat_mat: bool,
    pub(crate) circulation_fan: bool,
    pub(crate) exhaust_fan: bool,
    pub(crate) water_pump: bool,
    pub(crate) humidifier: bool,
}

impl From<DeviceStateDao> for DeviceFlags {
    fn from(val: DeviceStateDao) -> Self {
        DeviceFlags {
            grow_light: val.grow_light,
            heat_mat: val.heat_mat,
            circulation_fan: val.circulation_fan,
            exhaust_fan: val.exhaust_fan,
            water_pump: val.water_pump,
            humidifier: val.humidifier,
        }
    }
}

pub async fn insert(conn: &sqlx::PgPool, flags: &DeviceFlags) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO device_states
            (timestamp, grow_light, heat_mat, circulation_fan, exhaust_fan, water_pump, humidifier)
            VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(Utc::now().naive_utc())
    .bind(flags.grow_light)
    .bind(flags.heat_mat)
    .bind(flags.circulation_fan)
    .bind(flags.exhaust_fan)
    .bind(flags.water_pump)
    .bind(flags.humidifier)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_latest(conn: &sqlx::PgPool) -> Result<Option<DeviceStateDao>, DBError> {
    Ok(sqlx::query_as::<_, DeviceStateDao>(
        "SELECT * FROM device_states ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

pub async fn get_since(
    conn: &sqlx::PgPool,
    since: NaiveDateTime,
) -> Result<Vec<DeviceStateDao>, DBError> {
    Ok(sqlx::query_as::<_, DeviceStateDao>(
        "SELECT * FROM device_states WHERE timestamp >= $1 ORDER BY timestamp ASC",
    )
    .bind(since)
    .fetch_all(conn)
    .await?)
}

pub async fn get_range(
    conn: &sqlx::PgPool,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<DeviceStateDao>, DBError> {
    Ok(sqlx::query_as::<_, DeviceStateDao>(
        "SELECT * FROM device_states WHERE timestamp >= $1 AND timestamp < $2 ORDER BY timestamp ASC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?)
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    Ok(
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM device_states")
            .fetch_one(conn)
            .await?
            .count(),
    )
}
