use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use libris_db::BookStore;
use libris_http::AppError;

use super::models::{Book, CreateBook, DeleteConfirmation, UpdateBook};

pub type SharedStore = Arc<dyn BookStore>;

/// Book routes, relative to the module mount point.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<Book>>, AppError> {
    let books = store.list().await?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = store.get(&id).await?;
    Ok(Json(book))
}

async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(input) = payload?;
    let book = store.create(input).await?;

    tracing::info!(book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(patch) = payload?;
    let book = store.update(&id, patch).await?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    let book = store.delete(&id).await?;

    tracing::info!(book_id = %book.id, "book deleted");
    Ok(Json(DeleteConfirmation::deleted()))
}
