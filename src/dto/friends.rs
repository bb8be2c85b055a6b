use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateFriendRequest {
    pub name: String,
    pub url: String,
    pub avatar: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFriendRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFriendResponse {
    pub message: String,
}
