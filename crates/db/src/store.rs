use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Book, BookPatch, NewBook};

/// Persistence seam for catalog records.
///
/// Identifiers arrive as raw strings; a backend rejects anything that is not
/// a well-formed [`crate::BookId`] with [`StoreError::InvalidIdentifier`].
/// Mutations of the same record race with last-write-wins semantics.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every record, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn create(&self, new: NewBook) -> Result<Book, StoreError>;

    async fn get(&self, id: &str) -> Result<Book, StoreError>;

    /// Apply the present fields of `patch` and refresh `updated_at`.
    async fn update(&self, id: &str, patch: BookPatch) -> Result<Book, StoreError>;

    /// Remove the record for good, returning what was removed.
    async fn delete(&self, id: &str) -> Result<Book, StoreError>;
}
