use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::middleware::MaybeSession,
    dto::tags::{CreateTagRequest, DeleteTagResponse, TagPostsResponse, UpdateTagRequest},
    error::AppError,
    models::tags::Tag,
    usecases::tags::TagService,
};

pub async fn list_tags_handle(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let response = TagService::list_tags(&state.db).await?;
    Ok(Json(response))
}

pub async fn get_tag_handle(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
) -> Result<Json<Tag>, AppError> {
    let response = TagService::get_tag(&state.db, tag_id).await?;
    Ok(Json(response))
}

pub async fn posts_by_tag_handle(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TagPostsResponse>, AppError> {
    let response = TagService::posts_by_slug(&state.db, &slug).await?;
    Ok(Json(response))
}

pub async fn create_tag_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let session = session.as_ref();
    let response = TagService::create_tag(&state.db, session, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_tag_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(tag_id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    let session = session.as_ref();
    let response = TagService::update_tag(&state.db, session, tag_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_tag_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(tag_id): Path<Uuid>,
) -> Result<Json<DeleteTagResponse>, AppError> {
    let session = session.as_ref();
    let response = TagService::delete_tag(&state.db, session, tag_id).await?;
    Ok(Json(response))
}
