use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::middleware::Session,
    dto::images::{BatchDeleteImagesRequest, BatchDeleteResponse, DeleteImageResponse},
    error::AppError,
    models::images::Image,
    repositories::images as image_repo,
};

pub struct ImageService;

impl ImageService {
    pub async fn list_images(pool: &PgPool) -> Result<Vec<Image>, AppError> {
        image_repo::list_images(pool).await
    }

    pub async fn get_image(pool: &PgPool, image_id: Uuid) -> Result<Image, AppError> {
        image_repo::find_image_by_id(pool, image_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    pub async fn delete_image(
        pool: &PgPool,
        session: Option<&Session>,
        image_id: Uuid,
    ) -> Result<DeleteImageResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let removed = image_repo::delete_image(pool, image_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Image not found".to_string()));
        }

        Ok(DeleteImageResponse {
            message: "Image deleted".to_string(),
        })
    }

    pub async fn batch_delete_images(
        pool: &PgPool,
        session: Option<&Session>,
        req: BatchDeleteImagesRequest,
    ) -> Result<BatchDeleteResponse, AppError> {
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if req.ids.is_empty() {
            return Err(AppError::BadRequest("No image ids given".to_string()));
        }

        let removed = image_repo::delete_images(pool, &req.ids).await?;
        Ok(BatchDeleteResponse { removed })
    }
}
