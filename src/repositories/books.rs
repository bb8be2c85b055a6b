use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::books::{Book, BookStatus},
};

#[derive(Debug)]
pub(crate) struct CreateBookParams {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub rating: f64,
    pub status: BookStatus,
    pub owner_id: Uuid,
}

#[derive(Debug, Default)]
pub(crate) struct UpdateBookParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub publisher: Option<String>,
    pub publish_date: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub rating: Option<f64>,
    pub status: Option<BookStatus>,
    pub review: Option<String>,
}

pub async fn list_books(pool: &PgPool, status: Option<BookStatus>) -> Result<Vec<Book>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "books.list_books",
        sqlx::query_as::<_, Book>(
            r#"
            SELECT *
            FROM blog.book
            WHERE ($1::blog.book_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(pool)
    )?;

    Ok(rows)
}

pub async fn find_book_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Book>, AppError> {
    let book = crate::log_query_fetch_optional!(
        "books.find_book_by_id",
        sqlx::query_as::<_, Book>("SELECT * FROM blog.book WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
    )?;

    Ok(book)
}

pub async fn create_book(pool: &PgPool, params: CreateBookParams) -> Result<Book, AppError> {
    let book = crate::log_query_fetch_one!(
        "books.create_book",
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO blog.book (
                title, author, description, cover, publisher,
                publish_date, isbn, pages, rating, status, owner_id
            )
            VALUES (
                $1, $2, $3,
                COALESCE($4, '/images/default-book-cover.jpg'),
                $5, $6, $7, $8, $9, $10, $11
            )
            RETURNING *
            "#,
        )
        .bind(params.title)
        .bind(params.author)
        .bind(params.description)
        .bind(params.cover)
        .bind(params.publisher)
        .bind(params.publish_date)
        .bind(params.isbn)
        .bind(params.pages)
        .bind(params.rating)
        .bind(params.status)
        .bind(params.owner_id)
        .fetch_one(pool)
    )?;

    Ok(book)
}

pub async fn update_book(
    pool: &PgPool,
    id: Uuid,
    params: UpdateBookParams,
) -> Result<Option<Book>, AppError> {
    let book = crate::log_query_fetch_optional!(
        "books.update_book",
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE blog.book
            SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                cover = COALESCE($5, cover),
                publisher = COALESCE($6, publisher),
                publish_date = COALESCE($7, publish_date),
                isbn = COALESCE($8, isbn),
                pages = COALESCE($9, pages),
                rating = COALESCE($10, rating),
                status = COALESCE($11, status),
                review = COALESCE($12, review),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.title)
        .bind(params.author)
        .bind(params.description)
        .bind(params.cover)
        .bind(params.publisher)
        .bind(params.publish_date)
        .bind(params.isbn)
        .bind(params.pages)
        .bind(params.rating)
        .bind(params.status)
        .bind(params.review)
        .fetch_optional(pool)
    )?;

    Ok(book)
}

pub async fn delete_book(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "books.delete_book",
        sqlx::query("DELETE FROM blog.book WHERE id = $1")
            .bind(id)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}

pub async fn delete_books(pool: &PgPool, ids: &[Uuid]) -> Result<u64, AppError> {
    let result = crate::log_query_execute!(
        "books.delete_books",
        sqlx::query("DELETE FROM blog.book WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
    )?;

    Ok(result.rows_affected())
}
