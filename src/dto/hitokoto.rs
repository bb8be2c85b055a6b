use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateHitokotoRequest {
    pub content: String,
    #[serde(rename = "author")]
    pub source: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHitokotoRequest {
    pub content: Option<String>,
    #[serde(rename = "author")]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteHitokotoResponse {
    pub message: String,
}
