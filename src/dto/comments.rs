use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::comments::Comment, repositories::comments::PendingCommentRow};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub author: String,
    pub email: String,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Public comment shape. The author's email stays server-side; only the
/// admin pending view exposes it.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author: String,
    pub website: Option<String>,
    pub avatar: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            parent_id: comment.parent_id,
            content: comment.content,
            author: comment.author_name,
            website: comment.website,
            avatar: comment.avatar,
            approved: comment.approved,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCommentResponse {
    pub message: String,
    pub comment: CommentResponse,
}

#[derive(Debug, Serialize)]
pub struct DeleteCommentResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApproveCommentResponse {
    pub id: Uuid,
    pub approved: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PendingCommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: String,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author: String,
    pub email: String,
    pub website: Option<String>,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PendingCommentRow> for PendingCommentResponse {
    fn from(row: PendingCommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            post_title: row.post_title,
            user_id: row.user_id,
            parent_id: row.parent_id,
            content: row.content,
            author: row.author_name,
            email: row.author_email,
            website: row.website,
            avatar: row.avatar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
