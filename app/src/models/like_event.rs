use chrono::{NaiveDateTime, Utc};

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LikeEventDao {
    pub(crate) id: i32,
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) source: Option<String>,
    pub(crate) message: Option<String>,
}

pub async fn insert(
    conn: &sqlx::PgPool,
    source: &str,
    message: Option<String>,
) -> Result<(), DBError> {
    sqlx::query("INSERT INTO like_events (timestamp, source, message) VALUES ($1, $2, $3)")
        .bind(Utc::now().naive_utc())
        .bind(source)
        .bind(message)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    Ok(
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM like_events")
            .fetch_one(conn)
            .await?
            .count(),
    )
}

/// READ like_events, oldest first
pub async fn get_all(conn: &sqlx::PgPool) -> Result<Vec<LikeEventDao>, DBError> {
    Ok(
        sqlx::query_as::<_, LikeEventDao>("SELECT * FROM like_events ORDER BY timestamp ASC")
            .fetch_all(conn)
            .await?,
    )
}
