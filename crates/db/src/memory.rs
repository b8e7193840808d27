use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::model::{Book, BookId, BookPatch, NewBook};
use crate::store::BookStore;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    catalog: RwLock<Catalog>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.catalog.read().await.list())
    }

    async fn create(&self, new: NewBook) -> Result<Book, StoreError> {
        self.catalog.write().await.insert(new)
    }

    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.catalog.read().await.get(id).cloned()
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.catalog.write().await.update(id, patch)
    }

    async fn delete(&self, id: &str) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.catalog.write().await.remove(id)
    }
}
