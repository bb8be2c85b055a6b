use serde::{Deserialize, Serialize};

use crate::models::{posts::Post, tags::Tag};

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagPostsResponse {
    pub tag: Tag,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTagResponse {
    pub message: String,
}
