pub mod books;

use libris_db::BookStore;
use libris_kernel::ModuleRegistry;
use std::sync::Arc;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) -> anyhow::Result<()> {
    registry.register(books::create_module(store))
}
