use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    dto::hitokoto::{CreateHitokotoRequest, DeleteHitokotoResponse, UpdateHitokotoRequest},
    error::AppError,
    models::hitokoto::Hitokoto,
    usecases::hitokoto::HitokotoService,
};

pub async fn list_hitokoto_handle(
    State(state): State<AppState>,
) -> Result<Json<Vec<Hitokoto>>, AppError> {
    let response = HitokotoService::list_hitokoto(&state.db).await?;
    Ok(Json(response))
}

pub async fn create_hitokoto_handle(
    State(state): State<AppState>,
    Json(req): Json<CreateHitokotoRequest>,
) -> Result<(StatusCode, Json<Hitokoto>), AppError> {
    let response = HitokotoService::create_hitokoto(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_hitokoto_handle(
    State(state): State<AppState>,
    Path(hitokoto_id): Path<Uuid>,
    Json(req): Json<UpdateHitokotoRequest>,
) -> Result<Json<Hitokoto>, AppError> {
    let response = HitokotoService::update_hitokoto(&state.db, hitokoto_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_hitokoto_handle(
    State(state): State<AppState>,
    Path(hitokoto_id): Path<Uuid>,
) -> Result<Json<DeleteHitokotoResponse>, AppError> {
    let response = HitokotoService::delete_hitokoto(&state.db, hitokoto_id).await?;
    Ok(Json(response))
}
