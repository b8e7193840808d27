use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// Store-assigned book identifier (UUID v7, time ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| StoreError::InvalidIdentifier(value.to_string()))
    }
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied to `create`. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            category: Some(category.into()),
        }
    }

    /// Trim every field, failing if any is missing or blank.
    pub(crate) fn validate(self) -> Result<BookFields, StoreError> {
        let title = required(self.title);
        let author = required(self.author);
        let category = required(self.category);

        match (title, author, category) {
            (Some(title), Some(author), Some(category)) => Ok(BookFields {
                title,
                author,
                category,
            }),
            (title, author, category) => {
                let fields = [
                    ("title", title.is_none()),
                    ("author", author.is_none()),
                    ("category", category.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(StoreError::validation(StoreError::REQUIRED_MESSAGE, fields))
            }
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.category.is_none()
    }

    /// Trim present fields. A present field that trims to nothing is rejected
    /// with the same rule `create` applies.
    pub(crate) fn validate(self) -> Result<BookPatch, StoreError> {
        let mut blank = Vec::new();
        let mut check = |name: &'static str, value: Option<String>| match value {
            None => None,
            Some(raw) => {
                let trimmed = required(Some(raw));
                if trimmed.is_none() {
                    blank.push(name);
                }
                trimmed
            }
        };

        let patch = BookPatch {
            title: check("title", self.title),
            author: check("author", self.author),
            category: check("category", self.category),
        };

        if blank.is_empty() {
            Ok(patch)
        } else {
            Err(StoreError::validation(StoreError::BLANK_MESSAGE, blank))
        }
    }
}

/// Validated, trimmed editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BookFields {
    pub title: String,
    pub author: String,
    pub category: String,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
