use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::users::User};

pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = crate::log_query_fetch_optional!(
        "users.find_user_by_username",
        sqlx::query_as::<_, User>("SELECT * FROM core.user WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
    )?;

    Ok(user)
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = crate::log_query_fetch_optional!(
        "users.find_user_by_email",
        sqlx::query_as::<_, User>("SELECT * FROM core.user WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
    )?;

    Ok(user)
}

pub async fn username_taken_by_other(
    pool: &PgPool,
    username: &str,
    excluding: Uuid,
) -> Result<bool, AppError> {
    let exists = crate::log_query!(
        "users.username_taken_by_other",
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM core.user WHERE username = $1 AND id != $2)",
        )
        .bind(username)
        .bind(excluding)
        .fetch_one(pool)
    )?;

    Ok(exists)
}

#[derive(Debug, Default)]
pub(crate) struct UpdateProfileParams {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub password_hash: Option<String>,
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    params: UpdateProfileParams,
) -> Result<Option<User>, AppError> {
    let user = crate::log_query_fetch_optional!(
        "users.update_profile",
        sqlx::query_as::<_, User>(
            r#"
            UPDATE core.user
            SET
                username = COALESCE($2, username),
                avatar = COALESCE($3, avatar),
                nickname = COALESCE($4, nickname),
                bio = COALESCE($5, bio),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(params.username)
        .bind(params.avatar)
        .bind(params.nickname)
        .bind(params.bio)
        .bind(params.password_hash)
        .fetch_optional(pool)
    )?;

    Ok(user)
}
