use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COMMENT_AVATAR: &str = "/images/default-avatar.png";

/// Comment model mapped to blog.comment. A null parent_id marks a top-level
/// comment; a null user_id marks an anonymous one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub website: Option<String>,
    pub avatar: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
