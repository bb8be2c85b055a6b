use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::books::BookStatus;

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub cover: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub rating: Option<f64>,
    pub status: Option<BookStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub cover: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub rating: Option<f64>,
    pub status: Option<BookStatus>,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteBooksRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub removed: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteBookResponse {
    pub message: String,
}
