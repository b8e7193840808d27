use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::StoreError;
use crate::model::{Book, BookFields, BookId, BookPatch, NewBook};

/// The record collection shared by every backend, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn from_books(mut books: Vec<Book>) -> Self {
        books.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Self { books }
    }

    pub fn list(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn get(&self, id: BookId) -> Result<&Book, StoreError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn insert(&mut self, new: NewBook) -> Result<Book, StoreError> {
        let BookFields {
            title,
            author,
            category,
        } = new.validate()?;

        let mut id = BookId::generate();
        while self.books.iter().any(|book| book.id == id) {
            id = BookId::generate();
        }

        let now = tick(self.books.first().map(|newest| newest.created_at));
        let book = Book {
            id,
            title,
            author,
            category,
            created_at: now,
            updated_at: now,
        };
        self.books.insert(0, book.clone());
        Ok(book)
    }

    pub fn update(&mut self, id: BookId, patch: BookPatch) -> Result<Book, StoreError> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let BookPatch {
            title,
            author,
            category,
        } = patch.validate()?;

        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(category) = category {
            book.category = category;
        }
        book.updated_at = tick(Some(book.updated_at));

        Ok(book.clone())
    }

    pub fn remove(&mut self, id: BookId) -> Result<Book, StoreError> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.books.remove(index))
    }
}

/// Current time, nudged past `after` when the clock has not advanced.
fn tick(after: Option<OffsetDateTime>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    match after {
        Some(previous) if now <= previous => previous + Duration::nanoseconds(1),
        _ => now,
    }
}
