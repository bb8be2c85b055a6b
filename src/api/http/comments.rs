use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::middleware::{MaybeSession, Session},
    dto::comments::{
        ApproveCommentResponse, CommentResponse, CreateCommentRequest, CreateCommentResponse,
        DeleteCommentResponse, PendingCommentResponse,
    },
    error::AppError,
    usecases::comments::CommentService,
};

pub async fn list_post_comments_handle(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let response = CommentService::list_approved_for_post(&state.db, post_id).await?;
    Ok(Json(response))
}

pub async fn create_comment_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CreateCommentResponse>), AppError> {
    let session = session.as_ref();
    let response =
        CommentService::create_comment(&state.db, state.censor.as_ref(), post_id, session, req)
            .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_comment_handle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<DeleteCommentResponse>, AppError> {
    let response = CommentService::delete_comment(&state.db, comment_id, &session).await?;
    Ok(Json(response))
}

pub async fn approve_comment_handle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<ApproveCommentResponse>, AppError> {
    let response = CommentService::approve_comment(&state.db, comment_id, &session).await?;
    Ok(Json(response))
}

pub async fn list_pending_comments_handle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<PendingCommentResponse>>, AppError> {
    let response = CommentService::list_pending(&state.db, &session).await?;
    Ok(Json(response))
}

pub async fn list_all_comments_handle(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let response = CommentService::list_all(&state.db, &session).await?;
    Ok(Json(response))
}
