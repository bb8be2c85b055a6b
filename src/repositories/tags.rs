use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{posts::Post, tags::Tag},
};

pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "tags.list_tags",
        sqlx::query_as::<_, Tag>("SELECT * FROM blog.tag ORDER BY count DESC, name ASC")
            .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn find_tag_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tag>, AppError> {
    let tag = crate::log_query_fetch_optional!(
        "tags.find_tag_by_id",
        sqlx::query_as::<_, Tag>("SELECT * FROM blog.tag WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
    )?;

    Ok(tag)
}

pub async fn find_tag_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, AppError> {
    let tag = crate::log_query_fetch_optional!(
        "tags.find_tag_by_slug",
        sqlx::query_as::<_, Tag>("SELECT * FROM blog.tag WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
    )?;

    Ok(tag)
}

pub async fn slug_taken(
    pool: &PgPool,
    slug: &str,
    excluding: Option<Uuid>,
) -> Result<bool, AppError> {
    let exists = crate::log_query!(
        "tags.slug_taken",
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blog.tag
                WHERE slug = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(slug)
        .bind(excluding)
        .fetch_one(pool)
    )?;

    Ok(exists)
}

pub async fn create_tag(pool: &PgPool, name: &str, slug: &str) -> Result<Tag, AppError> {
    let tag = crate::log_query_fetch_one!(
        "tags.create_tag",
        sqlx::query_as::<_, Tag>(
            "INSERT INTO blog.tag (name, slug) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
    )?;

    Ok(tag)
}

pub async fn update_tag(
    pool: &PgPool,
    id: Uuid,
    name: Option<String>,
    slug: Option<String>,
) -> Result<Option<Tag>, AppError> {
    let tag = crate::log_query_fetch_optional!(
        "tags.update_tag",
        sqlx::query_as::<_, Tag>(
            r#"
            UPDATE blog.tag
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(pool)
    )?;

    Ok(tag)
}

pub async fn delete_tag(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "tags.delete_tag",
        sqlx::query("DELETE FROM blog.tag WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}

/// Looks a tag up by name inside a post mutation, creating it on first use.
/// New tags reuse the name as slug, matching how the editor submits them.
pub async fn find_or_create_tag_tx(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<Tag, AppError> {
    let existing = crate::log_query_fetch_optional!(
        "tags.find_tag_by_name",
        sqlx::query_as::<_, Tag>("SELECT * FROM blog.tag WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **tx)
    )?;
    if let Some(tag) = existing {
        return Ok(tag);
    }

    let tag = crate::log_query_fetch_one!(
        "tags.create_tag",
        sqlx::query_as::<_, Tag>(
            "INSERT INTO blog.tag (name, slug) VALUES ($1, $1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&mut **tx)
    )?;

    Ok(tag)
}

pub async fn adjust_tag_count_tx(
    tx: &mut Transaction<'_, Postgres>,
    tag_id: Uuid,
    delta: i32,
) -> Result<(), AppError> {
    crate::log_query_execute!(
        "tags.adjust_tag_count",
        sqlx::query("UPDATE blog.tag SET count = count + $2, updated_at = NOW() WHERE id = $1")
            .bind(tag_id)
            .bind(delta)
            .execute(&mut **tx)
    )?;

    Ok(())
}

pub async fn link_post_tag_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tag_id: Uuid,
) -> Result<(), AppError> {
    crate::log_query_execute!(
        "tags.link_post_tag",
        sqlx::query(
            "INSERT INTO blog.post_tag (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut **tx)
    )?;

    Ok(())
}

pub async fn unlink_post_tags_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    let tag_ids = crate::log_query_fetch_all!(
        "tags.unlink_post_tags",
        sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM blog.post_tag WHERE post_id = $1 RETURNING tag_id",
        )
        .bind(post_id)
        .fetch_all(&mut **tx)
    )?;

    Ok(tag_ids)
}

pub async fn tags_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Tag>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "tags.tags_for_post",
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM blog.tag t
            JOIN blog.post_tag pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn posts_for_tag(pool: &PgPool, tag_id: Uuid) -> Result<Vec<Post>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "tags.posts_for_tag",
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.*
            FROM blog.post p
            JOIN blog.post_tag pt ON pt.post_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(pool)
    )?;

    Ok(rows)
}
