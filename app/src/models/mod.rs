use crate::config::CONFIG;
use crate::error::DBError;

pub async fn establish_db_connection() -> Option<sqlx::PgPool> {
    let database_url = CONFIG.database_url();
    sqlx::postgres::PgPoolOptions::new()
        .connect(&database_url)
        .await
        .ok()
}

pub async fn run_migrations(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::migrate!().run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::query("SELECT count(*) FROM sensor_readings")
        .fetch_one(conn)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountRecord {
    pub count: Option<i64>,
}

impl CountRecord {
    pub fn count(self) -> i64 {
        self.count.unwrap_or(0)
    }
}

pub mod ai_output;
pub mod coin_metric;
pub mod device_state;
pub mod hourly_aggregate;
pub mod like_event;
pub mod sensor_reading;

#[cfg(test)]
mod test;
