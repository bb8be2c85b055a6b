use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::images::Image};

pub async fn list_images(pool: &PgPool) -> Result<Vec<Image>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "images.list_images",
        sqlx::query_as::<_, Image>("SELECT * FROM blog.image ORDER BY created_at DESC")
            .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn find_image_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Image>, AppError> {
    let image = crate::log_query_fetch_optional!(
        "images.find_image_by_id",
        sqlx::query_as::<_, Image>("SELECT * FROM blog.image WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
    )?;

    Ok(image)
}

pub async fn delete_image(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "images.delete_image",
        sqlx::query("DELETE FROM blog.image WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}

pub async fn delete_images(pool: &PgPool, ids: &[Uuid]) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "images.delete_images",
        sqlx::query("DELETE FROM blog.image WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}
