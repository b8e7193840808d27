//! View state of the client application.
//!
//! Every change goes through a named transition; the list only changes after
//! the server has confirmed the mutation.

use std::str::FromStr;

use libris_db::{Book, BookId, BookPatch, NewBook};

/// One of the three editable book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Category,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "title" => Ok(Field::Title),
            "author" => Ok(Field::Author),
            "category" => Ok(Field::Category),
            other => Err(format!(
                "unknown field '{other}'; expected title, author or category"
            )),
        }
    }
}

/// Input buffer for a new or edited record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
}

impl BookDraft {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Category => &mut self.category,
        };
        *slot = value.into();
    }

    /// All three fields are non-blank.
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.author, &self.category]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    pub fn to_new_book(&self) -> NewBook {
        NewBook::new(&self.title, &self.author, &self.category)
    }

    /// Patch carrying every field of the buffer.
    pub fn to_patch(&self) -> BookPatch {
        BookPatch {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            category: Some(self.category.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: BookId,
    pub buffer: BookDraft,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    books: Vec<Book>,
    draft: BookDraft,
    editing: Option<EditSession>,
    phase: LoadPhase,
    error: Option<String>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Book at a 1-based display position.
    pub fn book_at(&self, position: usize) -> Option<&Book> {
        position
            .checked_sub(1)
            .and_then(|index| self.books.get(index))
    }

    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_load(&mut self) {
        self.phase = LoadPhase::Loading;
        self.error = None;
    }

    pub fn finish_load(&mut self, books: Vec<Book>) {
        self.books = books;
        self.phase = LoadPhase::Loaded;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = LoadPhase::Errored;
    }

    /// Clear the error, keeping whatever list is already held.
    pub fn dismiss_error(&mut self) {
        if self.phase == LoadPhase::Errored {
            self.error = None;
            self.phase = LoadPhase::Loaded;
        }
    }

    pub fn set_draft_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn clear_draft(&mut self) {
        self.draft = BookDraft::default();
    }

    /// Server confirmed a create: newest goes first.
    pub fn apply_created(&mut self, book: Book) {
        self.books.insert(0, book);
        self.clear_draft();
    }

    /// Open the edit buffer for `id`, seeded from the current values.
    /// Any other open session is discarded. Returns false for unknown ids.
    pub fn begin_edit(&mut self, id: BookId) -> bool {
        match self.books.iter().find(|book| book.id == id) {
            Some(book) => {
                self.editing = Some(EditSession {
                    id,
                    buffer: BookDraft::from_book(book),
                });
                true
            }
            None => false,
        }
    }

    /// Returns false when no edit session is open.
    pub fn set_edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(session) => {
                session.buffer.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Server confirmed an update: replace the record in place and close its
    /// edit session.
    pub fn apply_updated(&mut self, book: Book) {
        if self.editing.as_ref().is_some_and(|session| session.id == book.id) {
            self.editing = None;
        }
        if let Some(slot) = self.books.iter_mut().find(|b| b.id == book.id) {
            *slot = book;
        }
    }

    /// Server confirmed a delete.
    pub fn apply_deleted(&mut self, id: BookId) {
        self.books.retain(|book| book.id != id);
        if self.editing.as_ref().is_some_and(|session| session.id == id) {
            self.editing = None;
        }
    }
}
