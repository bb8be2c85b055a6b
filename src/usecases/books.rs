use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::middleware::Session,
    dto::books::{
        BatchDeleteBooksRequest, BatchDeleteResponse, CreateBookRequest, DeleteBookResponse,
        ListBooksQuery, UpdateBookRequest,
    },
    error::AppError,
    models::{
        books::{Book, BookStatus},
        users::User,
    },
    repositories::{
        books as book_repo,
        books::{CreateBookParams, UpdateBookParams},
        users as user_repo,
    },
};

pub struct BookService;

impl BookService {
    pub async fn list_books(pool: &PgPool, query: ListBooksQuery) -> Result<Vec<Book>, AppError> {
        let status = parse_status_filter(query.status.as_deref())?;
        book_repo::list_books(pool, status).await
    }

    pub async fn get_book(pool: &PgPool, book_id: Uuid) -> Result<Book, AppError> {
        book_repo::find_book_by_id(pool, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn create_book(
        pool: &PgPool,
        session: Option<&Session>,
        req: CreateBookRequest,
    ) -> Result<Book, AppError> {
        let owner = require_user(pool, session).await?;

        let title = req.title.trim().to_string();
        let author = req.author.trim().to_string();
        if title.is_empty() || author.is_empty() {
            return Err(AppError::ValidationError(
                "Book title and author are required".to_string(),
            ));
        }

        book_repo::create_book(
            pool,
            CreateBookParams {
                title,
                author,
                description: req.description,
                cover: req.cover,
                publisher: req.publisher,
                publish_date: req.publish_date,
                isbn: req.isbn,
                pages: req.pages,
                rating: req.rating.unwrap_or(0.0),
                status: req.status.unwrap_or(BookStatus::Want),
                owner_id: owner.id,
            },
        )
        .await
    }

    pub async fn update_book(
        pool: &PgPool,
        session: Option<&Session>,
        book_id: Uuid,
        req: UpdateBookRequest,
    ) -> Result<Book, AppError> {
        require_user(pool, session).await?;

        book_repo::update_book(
            pool,
            book_id,
            UpdateBookParams {
                title: req.title,
                author: req.author,
                description: req.description,
                cover: req.cover,
                publisher: req.publisher,
                publish_date: req.publish_date,
                isbn: req.isbn,
                pages: req.pages,
                rating: req.rating,
                status: req.status,
                review: req.review,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn delete_book(
        pool: &PgPool,
        session: Option<&Session>,
        book_id: Uuid,
    ) -> Result<DeleteBookResponse, AppError> {
        require_user(pool, session).await?;

        let removed = book_repo::delete_book(pool, book_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        Ok(DeleteBookResponse {
            message: "Book deleted".to_string(),
        })
    }

    pub async fn batch_delete_books(
        pool: &PgPool,
        session: Option<&Session>,
        req: BatchDeleteBooksRequest,
    ) -> Result<BatchDeleteResponse, AppError> {
        require_user(pool, session).await?;

        if req.ids.is_empty() {
            return Err(AppError::BadRequest("No book ids given".to_string()));
        }

        let removed = book_repo::delete_books(pool, &req.ids).await?;
        Ok(BatchDeleteResponse { removed })
    }
}

/// Book mutations need a registered user to attribute ownership to.
async fn require_user(pool: &PgPool, session: Option<&Session>) -> Result<User, AppError> {
    let session =
        session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    user_repo::find_user_by_username(pool, &session.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<BookStatus>, AppError> {
    match status {
        None | Some("") | Some("all") => Ok(None),
        Some("reading") => Ok(Some(BookStatus::Reading)),
        Some("finished") => Ok(Some(BookStatus::Finished)),
        Some("want") => Ok(Some(BookStatus::Want)),
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown book status: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parses_known_values() {
        assert_eq!(
            parse_status_filter(Some("reading")).unwrap(),
            Some(BookStatus::Reading)
        );
        assert_eq!(
            parse_status_filter(Some("finished")).unwrap(),
            Some(BookStatus::Finished)
        );
        assert_eq!(
            parse_status_filter(Some("want")).unwrap(),
            Some(BookStatus::Want)
        );
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            parse_status_filter(Some("wishlist")),
            Err(AppError::BadRequest(_))
        ));
    }
}
