use chrono::{NaiveDateTime, Utc};

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AiOutputDao {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) output_text: String,
    pub(crate) sol_day: Option<i32>,
}

pub async fn insert(
    conn: &sqlx::PgPool,
    output_text: &str,
    sol_day: Option<i32>,
) -> Result<(), DBError> {
    sqlx::query("INSERT INTO ai_outputs (timestamp, output_text, sol_day) VALUES ($1, $2, $3)")
        .bind(Utc::now().naive_utc())
        .bind(output_text)
        .bind(sol_day)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn get_latest(conn: &sqlx::PgPool) -> Result<Option<AiOutputDao>, DBError> {
    Ok(sqlx::query_as::<_, AiOutputDao>(
        "SELECT * FROM ai_outputs ORDER BY timestamp DESC LIMIT 1",
    )
    .fetch_optional(conn)
    .await?)
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    Ok(
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM ai_outputs")
            .fetch_one(conn)
            .await?
            .count(),
    )
}
