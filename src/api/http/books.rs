use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::middleware::MaybeSession,
    dto::books::{
        BatchDeleteBooksRequest, BatchDeleteResponse, CreateBookRequest, DeleteBookResponse,
        ListBooksQuery, UpdateBookRequest,
    },
    error::AppError,
    models::books::Book,
    usecases::books::BookService,
};

pub async fn list_books_handle(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let response = BookService::list_books(&state.db, query).await?;
    Ok(Json(response))
}

pub async fn get_book_handle(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<Book>, AppError> {
    let response = BookService::get_book(&state.db, book_id).await?;
    Ok(Json(response))
}

pub async fn create_book_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let session = session.as_ref();
    let response = BookService::create_book(&state.db, session, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_book_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<Book>, AppError> {
    let session = session.as_ref();
    let response = BookService::update_book(&state.db, session, book_id, req).await?;
    Ok(Json(response))
}

pub async fn delete_book_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<DeleteBookResponse>, AppError> {
    let session = session.as_ref();
    let response = BookService::delete_book(&state.db, session, book_id).await?;
    Ok(Json(response))
}

pub async fn batch_delete_books_handle(
    State(state): State<AppState>,
    Extension(MaybeSession(session)): Extension<MaybeSession>,
    Json(req): Json<BatchDeleteBooksRequest>,
) -> Result<Json<BatchDeleteResponse>, AppError> {
    let session = session.as_ref();
    let response = BookService::batch_delete_books(&state.db, session, req).await?;
    Ok(Json(response))
}
