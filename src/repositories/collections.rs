use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::collections::Collection};

pub async fn list_collections(pool: &PgPool) -> Result<Vec<Collection>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "collections.list_collections",
        sqlx::query_as::<_, Collection>(
            "SELECT * FROM blog.collection ORDER BY created_at DESC",
        )
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn create_collection(
    pool: &PgPool,
    kind: &str,
    title: &str,
    author: Option<String>,
    cover: Option<String>,
    date: Option<String>,
    link: Option<String>,
) -> Result<Collection, AppError> {
    let row = crate::log_query_fetch_one!(
        "collections.create_collection",
        sqlx::query_as::<_, Collection>(
            r#"
            INSERT INTO blog.collection (kind, title, author, cover, date, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(kind)
        .bind(title)
        .bind(author)
        .bind(cover)
        .bind(date)
        .bind(link)
        .fetch_one(pool)
    )?;

    Ok(row)
}

pub async fn update_collection(
    pool: &PgPool,
    id: Uuid,
    kind: Option<String>,
    title: Option<String>,
    author: Option<String>,
    cover: Option<String>,
    date: Option<String>,
    link: Option<String>,
) -> Result<Option<Collection>, AppError> {
    let row = crate::log_query_fetch_optional!(
        "collections.update_collection",
        sqlx::query_as::<_, Collection>(
            r#"
            UPDATE blog.collection
            SET
                kind = COALESCE($2, kind),
                title = COALESCE($3, title),
                author = COALESCE($4, author),
                cover = COALESCE($5, cover),
                date = COALESCE($6, date),
                link = COALESCE($7, link),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(kind)
        .bind(title)
        .bind(author)
        .bind(cover)
        .bind(date)
        .bind(link)
        .fetch_optional(pool)
    )?;

    Ok(row)
}

pub async fn delete_collection(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "collections.delete_collection",
        sqlx::query("DELETE FROM blog.collection WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}
