//! Error kinds raised by book stores

use thiserror::Error;

use crate::model::BookId;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<&'static str>,
    },

    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("invalid book identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub const REQUIRED_MESSAGE: &'static str = "All fields are required";
    pub const BLANK_MESSAGE: &'static str = "Fields cannot be blank";

    pub fn validation(message: impl Into<String>, fields: Vec<&'static str>) -> Self {
        Self::Validation {
            message: message.into(),
            fields,
        }
    }

    /// True for failures of the persistence layer rather than of the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Serde(_))
    }
}
