use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::database::models::{Book, NewBook};
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::parse_id;

/// GET /books - List every live book record.
pub async fn list(State(store): State<Store>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = store.list_books().await?;
    Ok(Json(books))
}

/// GET /book/:id - Fetch a single book by id.
pub async fn get(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;

    let book = store
        .get_book(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("book {} not found", id)))?;

    Ok(Json(book))
}

/// POST /create/book - Create a book from the request body.
///
/// PersonID is taken as supplied; it is an ownership reference, not an
/// enforced foreign key, so unknown owners are accepted.
pub async fn create(
    State(store): State<Store>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(new_book) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let book = store.create_book(&new_book).await?;

    tracing::info!(id = book.id, "created book");
    Ok(Json(book))
}

/// DELETE /delete/book/:id - Soft-delete a book.
///
/// Frees the call number for reuse, since uniqueness only covers live rows.
pub async fn delete(
    State(store): State<Store>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;

    let book = store
        .delete_book(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("book {} not found", id)))?;

    tracing::info!(id = book.id, "deleted book");
    Ok(Json(book))
}
