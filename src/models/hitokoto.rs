use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A short quote shown on the front page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hitokoto {
    pub id: Uuid,
    pub content: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
