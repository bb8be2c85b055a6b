use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::hitokoto::Hitokoto};

pub async fn list_hitokoto(pool: &PgPool) -> Result<Vec<Hitokoto>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "hitokoto.list_hitokoto",
        sqlx::query_as::<_, Hitokoto>("SELECT * FROM blog.hitokoto ORDER BY created_at DESC")
            .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn create_hitokoto(
    pool: &PgPool,
    content: &str,
    source: Option<String>,
    created_at: DateTime<Utc>,
) -> Result<Hitokoto, AppError> {
    let row = crate::log_query_fetch_one!(
        "hitokoto.create_hitokoto",
        sqlx::query_as::<_, Hitokoto>(
            r#"
            INSERT INTO blog.hitokoto (content, source, created_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(source)
        .bind(created_at)
        .fetch_one(pool)
    )?;

    Ok(row)
}

pub async fn update_hitokoto(
    pool: &PgPool,
    id: Uuid,
    content: Option<String>,
    source: Option<String>,
) -> Result<Option<Hitokoto>, AppError> {
    let row = crate::log_query_fetch_optional!(
        "hitokoto.update_hitokoto",
        sqlx::query_as::<_, Hitokoto>(
            r#"
            UPDATE blog.hitokoto
            SET
                content = COALESCE($2, content),
                source = COALESCE($3, source),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(source)
        .fetch_optional(pool)
    )?;

    Ok(row)
}

pub async fn delete_hitokoto(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "hitokoto.delete_hitokoto",
        sqlx::query("DELETE FROM blog.hitokoto WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}
