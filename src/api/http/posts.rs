use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::middleware::MaybeSession,
    dto::posts::{
        CreatePostRequest, DeletePostResponse, ListPostsQuery, PostDetailResponse,
        PostListResponse, PostResponse, UpdatePostRequest,
    },
    error::AppError,
    usecases::posts::PostService,
};

pub async fn list_posts_handle(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let response = PostService::list_posts(&state.db, query).await?;
    Ok(Json(response))
}

pub async fn get_post_handle(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let response = PostService::get_post(&state.db, post_id).await?;
    Ok(Json(response))
}

pub async fn create_post_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let session = session.as_ref();
    let response = PostService::create_post(&state.db, session, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_post_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let session = session.as_ref();
    let response = PostService::update_post(&state.db, session, post_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_post_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<DeletePostResponse>, AppError> {
    let session = session.as_ref();
    let response = PostService::delete_post(&state.db, session, post_id).await?;
    Ok(Json(response))
}
