//! Record store for the library catalog.
//!
//! [`BookStore`] is the storage seam; [`MemoryBookStore`] keeps records in
//! process and [`JsonFileBookStore`] persists them to a JSON document.

use std::sync::Arc;

use libris_kernel::settings::{StoreBackend, StoreSettings};

mod catalog;
pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use file::JsonFileBookStore;
pub use memory::MemoryBookStore;
pub use model::{Book, BookId, BookPatch, NewBook};
pub use store::BookStore;

/// Open the store selected by `settings`.
pub async fn open(settings: &StoreSettings) -> Result<Arc<dyn BookStore>, StoreError> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!(target: "libris-db", "using in-memory book store");
            Ok(Arc::new(MemoryBookStore::new()))
        }
        StoreBackend::File => {
            let store = JsonFileBookStore::open(&settings.path).await?;
            tracing::info!(
                target: "libris-db",
                path = %settings.path.display(),
                "using JSON file book store"
            );
            Ok(Arc::new(store))
        }
    }
}
