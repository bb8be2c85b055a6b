use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteCollectionResponse {
    pub message: String,
}
