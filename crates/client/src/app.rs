use libris_db::{Book, BookId};

use crate::api::{ApiError, BookGateway};
use crate::state::CatalogState;

/// Client application: the view state plus the service it talks to.
///
/// Each action issues at most one request. Failures land in the state as the
/// user-facing message; the return value only says whether the server
/// confirmed the change.
pub struct CatalogApp<G> {
    gateway: G,
    state: CatalogState,
}

impl<G: BookGateway> CatalogApp<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: CatalogState::new(),
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CatalogState {
        &mut self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetch the whole list.
    pub async fn load(&mut self) -> bool {
        self.state.begin_load();
        match self.gateway.list().await {
            Ok(books) => {
                self.state.finish_load(books);
                true
            }
            Err(err) => self.failed(err),
        }
    }

    /// Submit the new-record draft. Does nothing while a field is blank.
    pub async fn add(&mut self) -> bool {
        if !self.state.draft().is_complete() {
            return false;
        }

        let new_book = self.state.draft().to_new_book();
        match self.gateway.create(&new_book).await {
            Ok(book) => {
                tracing::debug!(book_id = %book.id, "book added");
                self.state.apply_created(book);
                true
            }
            Err(err) => self.failed(err),
        }
    }

    /// Send the open edit buffer. Returns false when nothing is being edited.
    pub async fn save_edit(&mut self) -> bool {
        let Some(session) = self.state.editing() else {
            return false;
        };

        let id = session.id;
        let patch = session.buffer.to_patch();
        match self.gateway.update(&id, &patch).await {
            Ok(book) => {
                self.state.apply_updated(book);
                true
            }
            Err(err) => self.failed(err),
        }
    }

    pub async fn delete(&mut self, id: BookId) -> bool {
        match self.gateway.delete(&id).await {
            Ok(_) => {
                self.state.apply_deleted(id);
                true
            }
            Err(err) => self.failed(err),
        }
    }

    /// Fetch a single record without touching the held list.
    pub async fn fetch(&self, id: BookId) -> Result<Book, ApiError> {
        self.gateway.get(&id).await
    }

    fn failed(&mut self, err: ApiError) -> bool {
        tracing::warn!(error = %err, "catalog request failed");
        self.state.fail(err.user_message());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Field, LoadPhase};
    use async_trait::async_trait;
    use libris_db::{BookPatch, BookStore, MemoryBookStore, NewBook, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-process gateway answering the way the service does.
    #[derive(Default)]
    struct StoreGateway {
        store: MemoryBookStore,
        calls: AtomicUsize,
    }

    impl StoreGateway {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer<T>(&self, result: Result<T, StoreError>) -> Result<T, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            result.map_err(|err| {
                let (status, message) = match err {
                    StoreError::Validation { message, .. } => (400, message),
                    StoreError::NotFound(_) => (404, "Book not found".to_string()),
                    StoreError::InvalidIdentifier(_) => (400, "Invalid ID".to_string()),
                    _ => (500, "Server error".to_string()),
                };
                ApiError::Server { status, message }
            })
        }
    }

    #[async_trait]
    impl BookGateway for StoreGateway {
        async fn list(&self) -> Result<Vec<Book>, ApiError> {
            self.answer(self.store.list().await)
        }

        async fn get(&self, id: &BookId) -> Result<Book, ApiError> {
            self.answer(self.store.get(&id.to_string()).await)
        }

        async fn create(&self, book: &NewBook) -> Result<Book, ApiError> {
            self.answer(self.store.create(book.clone()).await)
        }

        async fn update(&self, id: &BookId, patch: &BookPatch) -> Result<Book, ApiError> {
            self.answer(self.store.update(&id.to_string(), patch.clone()).await)
        }

        async fn delete(&self, id: &BookId) -> Result<String, ApiError> {
            self.answer(self.store.delete(&id.to_string()).await)
                .map(|_| "Deleted successfully".to_string())
        }
    }

    async fn loaded_app(titles: &[&str]) -> CatalogApp<StoreGateway> {
        let gateway = StoreGateway::default();
        for title in titles {
            gateway
                .store
                .create(NewBook::new(*title, "Author", "Category"))
                .await
                .unwrap();
        }
        let mut app = CatalogApp::new(gateway);
        assert!(app.load().await);
        app
    }

    #[tokio::test]
    async fn load_fills_list() {
        let app = loaded_app(&["A", "B"]).await;
        assert_eq!(app.state().phase(), LoadPhase::Loaded);
        let titles: Vec<_> = app.state().books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn incomplete_draft_sends_nothing() {
        let mut app = loaded_app(&[]).await;
        app.state_mut().set_draft_field(Field::Title, "Dune");
        app.state_mut().set_draft_field(Field::Author, " ");
        app.state_mut().set_draft_field(Field::Category, "SF");

        let before = app.gateway().calls();
        assert!(!app.add().await);
        assert_eq!(app.gateway().calls(), before);
        assert_eq!(app.state().draft().title, "Dune");
    }

    #[tokio::test]
    async fn add_prepends_confirmed_book() {
        let mut app = loaded_app(&["Old"]).await;
        app.state_mut().set_draft_field(Field::Title, " Dune ");
        app.state_mut().set_draft_field(Field::Author, "Frank Herbert");
        app.state_mut().set_draft_field(Field::Category, "SF");

        assert!(app.add().await);
        assert_eq!(app.state().books()[0].title, "Dune");
        assert_eq!(app.state().books().len(), 2);
        assert!(app.state().draft().title.is_empty());
    }

    #[tokio::test]
    async fn save_edit_applies_server_copy() {
        let mut app = loaded_app(&["A"]).await;
        let id = app.state().books()[0].id;

        assert!(!app.save_edit().await);

        app.state_mut().begin_edit(id);
        app.state_mut().set_edit_field(Field::Category, "  Poetry ");
        assert!(app.save_edit().await);

        assert!(app.state().editing().is_none());
        assert_eq!(app.state().books()[0].category, "Poetry");
        assert_eq!(app.fetch(id).await.unwrap(), app.state().books()[0]);
    }

    #[tokio::test]
    async fn rejected_edit_surfaces_server_message() {
        let mut app = loaded_app(&["A"]).await;
        let original = app.state().books()[0].clone();

        app.state_mut().begin_edit(original.id);
        app.state_mut().set_edit_field(Field::Title, "");
        assert!(!app.save_edit().await);

        assert_eq!(app.state().phase(), LoadPhase::Errored);
        assert_eq!(app.state().error(), Some("Fields cannot be blank"));
        assert_eq!(app.state().books()[0], original);
    }

    #[tokio::test]
    async fn delete_removes_only_after_confirmation() {
        let mut app = loaded_app(&["A", "B"]).await;
        let id = app.state().books()[0].id;

        assert!(app.delete(id).await);
        assert_eq!(app.state().books().len(), 1);

        assert!(!app.delete(id).await);
        assert_eq!(app.state().error(), Some("Book not found"));
        assert_eq!(app.state().books().len(), 1);
    }
}
