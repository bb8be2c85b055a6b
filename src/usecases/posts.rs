use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::middleware::Session,
    dto::{
        comments::CommentResponse,
        posts::{
            CreatePostRequest, DeletePostResponse, ListPostsQuery, PostDetailResponse,
            PostListResponse, PostResponse, UpdatePostRequest,
        },
    },
    error::AppError,
    repositories::{
        comments as comment_repo, posts as post_repo,
        posts::{CreatePostParams, UpdatePostParams},
        tags as tag_repo,
    },
    telemetry::BusinessEvent,
};

pub struct PostService;

impl PostService {
    pub async fn list_posts(
        pool: &PgPool,
        query: ListPostsQuery,
    ) -> Result<PostListResponse, AppError> {
        let published = published_filter(query.status.as_deref());
        let rows = post_repo::list_posts(pool, published).await?;

        let mut posts = Vec::with_capacity(rows.len());
        for post in rows {
            let tags = tag_repo::tags_for_post(pool, post.id).await?;
            posts.push(PostResponse::from_post(post, tags));
        }

        let total = posts.len();
        Ok(PostListResponse { posts, total })
    }

    pub async fn get_post(pool: &PgPool, post_id: Uuid) -> Result<PostDetailResponse, AppError> {
        let post = post_repo::find_post_by_id(pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let tags = tag_repo::tags_for_post(pool, post_id).await?;
        let comments = comment_repo::list_approved_for_post(pool, post_id).await?;

        // The view bump happens after the read; a failed bump never fails
        // the request.
        if let Err(err) = post_repo::increment_views(pool, post_id).await {
            warn!(error = %err, post_id = %post_id, "Failed to increment view counter");
        }

        Ok(PostDetailResponse {
            post: PostResponse::from_post(post, tags),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
        })
    }

    pub async fn create_post(
        pool: &PgPool,
        session: Option<&Session>,
        req: CreatePostRequest,
    ) -> Result<PostResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let title = require_field(&req.title, "Post title is required")?;
        let content = require_field(&req.content, "Post content is required")?;
        let excerpt = require_field(&req.excerpt, "Post excerpt is required")?;
        let author = require_field(&req.author, "Post author is required")?;
        let tag_names = dedup_tags(req.tags.unwrap_or_default());

        let mut tx = pool.begin().await?;
        let post = post_repo::create_post_tx(
            &mut tx,
            CreatePostParams {
                title,
                content,
                excerpt,
                cover_image: req.cover_image,
                published: req.published,
                author,
                author_type: req.author_type,
            },
        )
        .await?;

        for name in &tag_names {
            let tag = tag_repo::find_or_create_tag_tx(&mut tx, name).await?;
            tag_repo::adjust_tag_count_tx(&mut tx, tag.id, 1).await?;
            tag_repo::link_post_tag_tx(&mut tx, post.id, tag.id).await?;
        }
        tx.commit().await?;

        BusinessEvent::PostCreated { post_id: post.id }.log();

        let tags = tag_repo::tags_for_post(pool, post.id).await?;
        Ok(PostResponse::from_post(post, tags))
    }

    pub async fn update_post(
        pool: &PgPool,
        session: Option<&Session>,
        post_id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let existing = post_repo::find_post_by_id(pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        // Stamp published_at only on the draft-to-published transition.
        let set_published_at = req.published == Some(true) && !existing.published;

        let mut tx = pool.begin().await?;
        let post = post_repo::update_post_tx(
            &mut tx,
            post_id,
            UpdatePostParams {
                title: req.title,
                content: req.content,
                excerpt: req.excerpt,
                cover_image: req.cover_image,
                published: req.published,
                author: req.author,
                author_type: req.author_type,
                set_published_at,
            },
        )
        .await?;

        if let Some(tags) = req.tags {
            let removed = tag_repo::unlink_post_tags_tx(&mut tx, post_id).await?;
            for tag_id in removed {
                tag_repo::adjust_tag_count_tx(&mut tx, tag_id, -1).await?;
            }
            for name in dedup_tags(tags) {
                let tag = tag_repo::find_or_create_tag_tx(&mut tx, &name).await?;
                tag_repo::adjust_tag_count_tx(&mut tx, tag.id, 1).await?;
                tag_repo::link_post_tag_tx(&mut tx, post_id, tag.id).await?;
            }
        }
        tx.commit().await?;

        let tags = tag_repo::tags_for_post(pool, post_id).await?;
        Ok(PostResponse::from_post(post, tags))
    }

    pub async fn delete_post(
        pool: &PgPool,
        session: Option<&Session>,
        post_id: Uuid,
    ) -> Result<DeletePostResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !post_repo::post_exists(pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let mut tx = pool.begin().await?;
        let removed = tag_repo::unlink_post_tags_tx(&mut tx, post_id).await?;
        for tag_id in removed {
            tag_repo::adjust_tag_count_tx(&mut tx, tag_id, -1).await?;
        }
        post_repo::delete_comments_for_post_tx(&mut tx, post_id).await?;
        post_repo::delete_post_tx(&mut tx, post_id).await?;
        tx.commit().await?;

        BusinessEvent::PostDeleted { post_id }.log();

        Ok(DeletePostResponse {
            message: "Post deleted".to_string(),
        })
    }
}

fn published_filter(status: Option<&str>) -> Option<bool> {
    match status {
        Some("published") => Some(true),
        Some("draft") => Some(false),
        _ => None,
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn require_field(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_maps_to_published_flag() {
        assert_eq!(published_filter(Some("published")), Some(true));
        assert_eq!(published_filter(Some("draft")), Some(false));
        assert_eq!(published_filter(Some("all")), None);
        assert_eq!(published_filter(None), None);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated_in_order() {
        let tags = vec![
            " rust ".to_string(),
            "axum".to_string(),
            "rust".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(dedup_tags(tags), vec!["rust", "axum"]);
    }
}
