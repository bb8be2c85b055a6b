use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::friends::Friend};

pub async fn list_friends(pool: &PgPool) -> Result<Vec<Friend>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "friends.list_friends",
        sqlx::query_as::<_, Friend>("SELECT * FROM blog.friend ORDER BY created_at DESC")
            .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn create_friend(
    pool: &PgPool,
    name: &str,
    url: &str,
    avatar: Option<String>,
    description: Option<String>,
) -> Result<Friend, AppError> {
    let friend = crate::log_query_fetch_one!(
        "friends.create_friend",
        sqlx::query_as::<_, Friend>(
            r#"
            INSERT INTO blog.friend (name, url, avatar, description)
            VALUES ($1, $2, COALESCE($3, '/images/default-avatar.png'), $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(url)
        .bind(avatar)
        .bind(description)
        .fetch_one(pool)
    )?;

    Ok(friend)
}

pub async fn update_friend(
    pool: &PgPool,
    id: Uuid,
    name: Option<String>,
    url: Option<String>,
    avatar: Option<String>,
    description: Option<String>,
) -> Result<Option<Friend>, AppError> {
    let friend = crate::log_query_fetch_optional!(
        "friends.update_friend",
        sqlx::query_as::<_, Friend>(
            r#"
            UPDATE blog.friend
            SET
                name = COALESCE($2, name),
                url = COALESCE($3, url),
                avatar = COALESCE($4, avatar),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(url)
        .bind(avatar)
        .bind(description)
        .fetch_optional(pool)
    )?;

    Ok(friend)
}

pub async fn delete_friend(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "friends.delete_friend",
        sqlx::query("DELETE FROM blog.friend WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}
