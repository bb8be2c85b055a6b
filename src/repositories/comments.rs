use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{error::AppError, models::comments::Comment};

#[derive(Debug)]
pub(crate) struct CreateCommentParams {
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub website: Option<String>,
    pub avatar: String,
    pub approved: bool,
}

/// Pending-queue row; carries the post title for the admin review screen.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PendingCommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: String,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub website: Option<String>,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create_comment(
    pool: &PgPool,
    params: CreateCommentParams,
) -> Result<Comment, AppError> {
    let row = crate::log_query_fetch_one!(
        "comments.create_comment",
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO blog.comment (
                post_id,
                user_id,
                parent_id,
                content,
                author_name,
                author_email,
                website,
                avatar,
                approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(params.post_id)
        .bind(params.user_id)
        .bind(params.parent_id)
        .bind(params.content)
        .bind(params.author_name)
        .bind(params.author_email)
        .bind(params.website)
        .bind(params.avatar)
        .bind(params.approved)
        .fetch_one(pool)
    )?;

    Ok(row)
}

pub async fn find_comment_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, AppError> {
    let row = crate::log_query_fetch_optional!(
        "comments.find_comment_by_id",
        sqlx::query_as::<_, Comment>("SELECT * FROM blog.comment WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
    )?;

    Ok(row)
}

pub async fn list_child_ids(pool: &PgPool, parent_id: Uuid) -> Result<Vec<Uuid>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "comments.list_child_ids",
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM blog.comment WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_all(pool)
    )?;

    Ok(rows)
}

/// Deletes one row; returns the affected count so callers can tolerate rows
/// already removed by a concurrent cascade.
pub async fn delete_comment_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "comments.delete_comment",
        sqlx::query("DELETE FROM blog.comment WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}

pub async fn approve_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, AppError> {
    let row = crate::log_query_fetch_optional!(
        "comments.approve_comment",
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE blog.comment
            SET approved = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
    )?;

    Ok(row)
}

pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingCommentRow>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "comments.list_pending",
        sqlx::query_as::<_, PendingCommentRow>(
            r#"
            SELECT
                c.id,
                c.post_id,
                p.title AS post_title,
                c.user_id,
                c.parent_id,
                c.content,
                c.author_name,
                c.author_email,
                c.website,
                c.avatar,
                c.created_at,
                c.updated_at
            FROM blog.comment c
            JOIN blog.post p ON p.id = c.post_id
            WHERE c.approved = FALSE
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn list_approved_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Comment>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "comments.list_approved_for_post",
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT *
            FROM blog.comment
            WHERE post_id = $1 AND approved = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Comment>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "comments.list_all",
        sqlx::query_as::<_, Comment>("SELECT * FROM blog.comment ORDER BY created_at DESC")
            .fetch_all(pool)
    )?;

    Ok(rows)
}
