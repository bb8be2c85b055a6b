use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::comments::CommentResponse,
    models::{
        posts::{AuthorType, Post},
        tags::Tag,
    },
};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub tags: Option<Vec<String>>,
    pub author: String,
    #[serde(rename = "authorType")]
    pub author_type: AuthorType,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    #[serde(rename = "authorType")]
    pub author_type: Option<AuthorType>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub published: bool,
    pub views: i32,
    pub author_type: AuthorType,
    pub author: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PostResponse {
    pub fn from_post(post: Post, tags: Vec<Tag>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            cover_image: post.cover_image,
            published: post.published,
            views: post.views,
            author_type: post.author_type,
            author: post.author,
            tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
            published_at: post.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub message: String,
}
