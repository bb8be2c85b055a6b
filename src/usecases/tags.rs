use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::middleware::Session,
    dto::tags::{CreateTagRequest, DeleteTagResponse, TagPostsResponse, UpdateTagRequest},
    error::AppError,
    models::tags::Tag,
    repositories::tags as tag_repo,
};

pub struct TagService;

impl TagService {
    pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, AppError> {
        tag_repo::list_tags(pool).await
    }

    pub async fn get_tag(pool: &PgPool, tag_id: Uuid) -> Result<Tag, AppError> {
        tag_repo::find_tag_by_id(pool, tag_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))
    }

    pub async fn posts_by_slug(pool: &PgPool, slug: &str) -> Result<TagPostsResponse, AppError> {
        let tag = tag_repo::find_tag_by_slug(pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;
        let posts = tag_repo::posts_for_tag(pool, tag.id).await?;

        Ok(TagPostsResponse { tag, posts })
    }

    pub async fn create_tag(
        pool: &PgPool,
        session: Option<&Session>,
        req: CreateTagRequest,
    ) -> Result<Tag, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let name = require_field(&req.name, "Tag name is required")?;
        let slug = require_field(&req.slug, "Tag slug is required")?;

        if tag_repo::slug_taken(pool, &slug, None).await? {
            return Err(AppError::Conflict("Tag slug already exists".to_string()));
        }

        tag_repo::create_tag(pool, &name, &slug).await
    }

    pub async fn update_tag(
        pool: &PgPool,
        session: Option<&Session>,
        tag_id: Uuid,
        req: UpdateTagRequest,
    ) -> Result<Tag, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let existing = tag_repo::find_tag_by_id(pool, tag_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

        let name = normalize(req.name);
        let slug = normalize(req.slug);
        if let Some(slug) = &slug {
            if *slug != existing.slug && tag_repo::slug_taken(pool, slug, Some(tag_id)).await? {
                return Err(AppError::Conflict("Tag slug already exists".to_string()));
            }
        }

        tag_repo::update_tag(pool, tag_id, name, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))
    }

    pub async fn delete_tag(
        pool: &PgPool,
        session: Option<&Session>,
        tag_id: Uuid,
    ) -> Result<DeleteTagResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let removed = tag_repo::delete_tag(pool, tag_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Tag not found".to_string()));
        }

        Ok(DeleteTagResponse {
            message: "Tag deleted".to_string(),
        })
    }
}

fn require_field(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
