use serde::{Deserialize, Serialize};

pub use libris_db::{Book, BookPatch as UpdateBook, NewBook as CreateBook};

/// Confirmation body returned by `DELETE /api/books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    pub fn deleted() -> Self {
        Self {
            message: "Deleted successfully".to_string(),
        }
    }
}
