use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    dto::collections::{
        CreateCollectionRequest, DeleteCollectionResponse, UpdateCollectionRequest,
    },
    error::AppError,
    models::collections::Collection,
    usecases::collections::CollectionService,
};

pub async fn list_collections_handle(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, AppError> {
    let response = CollectionService::list_collections(&state.db).await?;
    Ok(Json(response))
}

pub async fn create_collection_handle(
    State(state): State<AppState>,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    let response = CollectionService::create_collection(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_collection_handle(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
    Json(req): Json<UpdateCollectionRequest>,
) -> Result<Json<Collection>, AppError> {
    let response = CollectionService::update_collection(&state.db, collection_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_collection_handle(
    State(state): State<AppState>,
    Path(collection_id): Path<Uuid>,
) -> Result<Json<DeleteCollectionResponse>, AppError> {
    let response = CollectionService::delete_collection(&state.db, collection_id).await?;
    Ok(Json(response))
}
