use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BatchDeleteImagesRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub removed: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteImageResponse {
    pub message: String,
}
