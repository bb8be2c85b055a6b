use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    dto::friends::{CreateFriendRequest, DeleteFriendResponse, UpdateFriendRequest},
    error::AppError,
    models::friends::Friend,
    usecases::friends::FriendService,
};

pub async fn list_friends_handle(
    State(state): State<AppState>,
) -> Result<Json<Vec<Friend>>, AppError> {
    let response = FriendService::list_friends(&state.db).await?;
    Ok(Json(response))
}

pub async fn create_friend_handle(
    State(state): State<AppState>,
    Json(req): Json<CreateFriendRequest>,
) -> Result<(StatusCode, Json<Friend>), AppError> {
    let response = FriendService::create_friend(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_friend_handle(
    State(state): State<AppState>,
    Path(friend_id): Path<Uuid>,
    Json(req): Json<UpdateFriendRequest>,
) -> Result<Json<Friend>, AppError> {
    let response = FriendService::update_friend(&state.db, friend_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_friend_handle(
    State(state): State<AppState>,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<DeleteFriendResponse>, AppError> {
    let response = FriendService::delete_friend(&state.db, friend_id).await?;
    Ok(Json(response))
}
