use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::collections::{
        CreateCollectionRequest, DeleteCollectionResponse, UpdateCollectionRequest,
    },
    error::AppError,
    models::collections::Collection,
    repositories::collections as collection_repo,
};

pub struct CollectionService;

impl CollectionService {
    pub async fn list_collections(pool: &PgPool) -> Result<Vec<Collection>, AppError> {
        collection_repo::list_collections(pool).await
    }

    pub async fn create_collection(
        pool: &PgPool,
        req: CreateCollectionRequest,
    ) -> Result<Collection, AppError> {
        let kind = req.kind.trim();
        let title = req.title.trim();
        if kind.is_empty() || title.is_empty() {
            return Err(AppError::ValidationError(
                "Collection type and title are required".to_string(),
            ));
        }

        collection_repo::create_collection(
            pool, kind, title, req.author, req.cover, req.date, req.link,
        )
        .await
    }

    pub async fn update_collection(
        pool: &PgPool,
        collection_id: Uuid,
        req: UpdateCollectionRequest,
    ) -> Result<Collection, AppError> {
        collection_repo::update_collection(
            pool,
            collection_id,
            req.kind,
            req.title,
            req.author,
            req.cover,
            req.date,
            req.link,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Collection entry not found".to_string()))
    }

    pub async fn delete_collection(
        pool: &PgPool,
        collection_id: Uuid,
    ) -> Result<DeleteCollectionResponse, AppError> {
        let removed = collection_repo::delete_collection(pool, collection_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Collection entry not found".to_string()));
        }

        Ok(DeleteCollectionResponse {
            message: "Collection entry deleted".to_string(),
        })
    }
}
