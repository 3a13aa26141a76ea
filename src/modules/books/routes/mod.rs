//! HTTP handlers for the catalog.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bookshelf_http::{
    error::AppError,
    extract::{ValidatedJson, ValidatedPath, ValidatedQuery},
};

use super::models::{Book, BookIdPath, BookRequest, PublishedDateQuery, RatingQuery};
use super::store::{BookStore, CatalogError};
use crate::utils;

const NOT_FOUND_MESSAGE: &str = "Item not found";

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        tracing::debug!(error = %err, "catalog lookup missed");
        AppError::not_found(NOT_FOUND_MESSAGE)
    }
}

/// Builds the catalog router over `store`.
pub fn router(store: BookStore) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::info!(target: "project.routes", %prefix, "registering catalog routes");

    Router::new()
        .route("/books", get(list_books))
        .route("/books/", get(books_by_rating))
        .route("/books/publish/", get(books_by_published_date))
        .route("/books/update_book", put(update_book))
        .route("/books/{book_id}", get(get_book).delete(delete_book))
        .route("/create-book", post(create_book))
        .with_state(store)
}

async fn list_books(State(store): State<BookStore>) -> Json<Vec<Book>> {
    Json(store.list().await)
}

async fn get_book(
    State(store): State<BookStore>,
    ValidatedPath(path): ValidatedPath<BookIdPath>,
) -> Result<Json<Book>, AppError> {
    let book = store.get(path.book_id).await?;
    Ok(Json(book))
}

async fn books_by_rating(
    State(store): State<BookStore>,
    ValidatedQuery(query): ValidatedQuery<RatingQuery>,
) -> Json<Vec<Book>> {
    Json(store.by_rating(query.book_rating).await)
}

async fn books_by_published_date(
    State(store): State<BookStore>,
    ValidatedQuery(query): ValidatedQuery<PublishedDateQuery>,
) -> Json<Vec<Book>> {
    Json(store.by_published_date(query.published_date).await)
}

async fn create_book(
    State(store): State<BookStore>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> StatusCode {
    let book = store.create(request).await;
    tracing::info!(book_id = book.id, title = %book.title, "book created");
    StatusCode::CREATED
}

async fn update_book(
    State(store): State<BookStore>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> Result<StatusCode, AppError> {
    // A body without an id cannot match any record.
    let Some(id) = request.id else {
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    };

    let replaced = store.update(request.into_book(id)).await?;
    tracing::info!(book_id = id, replaced, "book updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(store): State<BookStore>,
    ValidatedPath(path): ValidatedPath<BookIdPath>,
) -> Result<StatusCode, AppError> {
    let removed = store.delete(path.book_id).await?;
    tracing::info!(book_id = path.book_id, removed, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
