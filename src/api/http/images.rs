use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::middleware::MaybeSession,
    dto::images::{BatchDeleteImagesRequest, BatchDeleteResponse, DeleteImageResponse},
    error::AppError,
    models::images::Image,
    usecases::images::ImageService,
};

pub async fn list_images_handle(
    State(state): State<AppState>,
) -> Result<Json<Vec<Image>>, AppError> {
    let response = ImageService::list_images(&state.db).await?;
    Ok(Json(response))
}

pub async fn get_image_handle(
    State(state): State<AppState>,
    Path(image_id): Path<Uuid>,
) -> Result<Json<Image>, AppError> {
    let response = ImageService::get_image(&state.db, image_id).await?;
    Ok(Json(response))
}

pub async fn delete_image_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(image_id): Path<Uuid>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let session = session.as_ref();
    let response = ImageService::delete_image(&state.db, session, image_id).await?;
    Ok(Json(response))
}

pub async fn batch_delete_images_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<BatchDeleteImagesRequest>,
) -> Result<Json<BatchDeleteResponse>, AppError> {
    let session = session.as_ref();
    let response = ImageService::batch_delete_images(&state.db, session, req).await?;
    Ok(Json(response))
}
