use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::posts::{AuthorType, Post},
};

#[derive(Debug)]
pub(crate) struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author: String,
    pub author_type: AuthorType,
}

#[derive(Debug, Default)]
pub(crate) struct UpdatePostParams {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    pub author: Option<String>,
    pub author_type: Option<AuthorType>,
    pub set_published_at: bool,
}

pub async fn find_post_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, AppError> {
    let post = crate::log_query_fetch_optional!(
        "posts.find_post_by_id",
        sqlx::query_as::<_, Post>("SELECT * FROM blog.post WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
    )?;

    Ok(post)
}

pub async fn post_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists = crate::log_query!(
        "posts.post_exists",
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM blog.post WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
    )?;

    Ok(exists)
}

pub async fn list_posts(pool: &PgPool, published: Option<bool>) -> Result<Vec<Post>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "posts.list_posts",
        sqlx::query_as::<_, Post>(
            r#"
            SELECT *
            FROM blog.post
            WHERE ($1::boolean IS NULL OR published = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(published)
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn create_post_tx(
    tx: &mut Transaction<'_, Postgres>,
    params: CreatePostParams,
) -> Result<Post, AppError> {
    let post = crate::log_query_fetch_one!(
        "posts.create_post",
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO blog.post (
                title,
                content,
                excerpt,
                cover_image,
                published,
                author,
                author_type,
                published_at
            )
            VALUES (
                $1, $2, $3,
                COALESCE($4, '/images/post-cover.jpg'),
                $5, $6, $7,
                CASE WHEN $5 THEN NOW() ELSE NULL END
            )
            RETURNING *
            "#,
        )
        .bind(params.title)
        .bind(params.content)
        .bind(params.excerpt)
        .bind(params.cover_image)
        .bind(params.published)
        .bind(params.author)
        .bind(params.author_type)
        .fetch_one(&mut **tx)
    )?;

    Ok(post)
}

pub async fn update_post_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    params: UpdatePostParams,
) -> Result<Post, AppError> {
    let post = crate::log_query_fetch_one!(
        "posts.update_post",
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE blog.post
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                excerpt = COALESCE($4, excerpt),
                cover_image = COALESCE($5, cover_image),
                published = COALESCE($6, published),
                author = COALESCE($7, author),
                author_type = COALESCE($8, author_type),
                published_at = CASE WHEN $9 THEN NOW() ELSE published_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.title)
        .bind(params.content)
        .bind(params.excerpt)
        .bind(params.cover_image)
        .bind(params.published)
        .bind(params.author)
        .bind(params.author_type)
        .bind(params.set_published_at)
        .fetch_one(&mut **tx)
    )?;

    Ok(post)
}

pub async fn delete_post_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "posts.delete_post",
        sqlx::query("DELETE FROM blog.post WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}

pub async fn delete_comments_for_post_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "posts.delete_comments_for_post",
        sqlx::query("DELETE FROM blog.comment WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut **tx)
    )?;

    Ok(result.rows_affected())
}

/// View-counter bump on reads; failures are logged by the caller and never
/// fail the request.
pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    crate::log_query_execute!(
        "posts.increment_views",
        sqlx::query("UPDATE blog.post SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(())
}
