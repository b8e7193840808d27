use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::model::{Book, BookId, BookPatch, NewBook};
use crate::store::BookStore;

/// Store persisting the whole catalog as one JSON document.
///
/// Each mutation is applied to a copy, written to `<path>.tmp` and renamed
/// into place; memory is only updated once the rename succeeded.
#[derive(Debug)]
pub struct JsonFileBookStore {
    path: PathBuf,
    catalog: RwLock<Catalog>,
}

impl JsonFileBookStore {
    /// Load the catalog at `path`. A missing file is an empty catalog.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let catalog = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Catalog::default(),
            Ok(bytes) => {
                let books: Vec<Book> = serde_json::from_slice(&bytes)?;
                Catalog::from_books(books)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Catalog::default(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            catalog: RwLock::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file receiving each write before the rename.
    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    async fn commit<T>(
        &self,
        op: impl FnOnce(&mut Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.catalog.write().await;
        let mut next = guard.clone();
        let output = op(&mut next)?;

        if let Err(err) = self.persist(&next).await {
            tracing::error!(
                target: "libris-db",
                path = %self.path.display(),
                error = %err,
                "failed to persist catalog"
            );
            return Err(err);
        }

        *guard = next;
        Ok(output)
    }

    async fn persist(&self, catalog: &Catalog) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec_pretty(catalog)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for JsonFileBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.catalog.read().await.list())
    }

    async fn create(&self, new: NewBook) -> Result<Book, StoreError> {
        self.commit(|catalog| catalog.insert(new)).await
    }

    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.catalog.read().await.get(id).cloned()
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.commit(|catalog| catalog.update(id, patch)).await
    }

    async fn delete(&self, id: &str) -> Result<Book, StoreError> {
        let id: BookId = id.parse()?;
        self.commit(|catalog| catalog.remove(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("books.json");

        let store = JsonFileBookStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let first = store.create(NewBook::new("A", "B", "C")).await.unwrap();
        let second = store.create(NewBook::new("D", "E", "F")).await.unwrap();
        let edited = store
            .update(
                &first.id.to_string(),
                BookPatch {
                    category: Some("Z".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reopened = JsonFileBookStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![second, edited]);
        assert!(!reopened.tmp_path().exists());
    }

    #[tokio::test]
    async fn delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let store = JsonFileBookStore::open(&path).await.unwrap();
        let book = store.create(NewBook::new("A", "B", "C")).await.unwrap();
        store.delete(&book.id.to_string()).await.unwrap();

        let reopened = JsonFileBookStore::open(&path).await.unwrap();
        assert!(reopened.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let store = JsonFileBookStore::open(blocker.join("books.json"))
            .await
            .unwrap();

        // A regular file where the parent directory should be.
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = store
            .create(NewBook::new("A", "B", "C"))
            .await
            .unwrap_err();
        assert!(err.is_internal());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn temp_file_keeps_the_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        // Only `books.json.tmp` may be used, so this directory is harmless.
        std::fs::create_dir(dir.path().join("books.tmp")).unwrap();

        let store = JsonFileBookStore::open(&path).await.unwrap();
        assert_eq!(store.tmp_path(), dir.path().join("books.json.tmp"));
        store.create(NewBook::new("A", "B", "C")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_update_and_delete_leave_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let store = JsonFileBookStore::open(&path).await.unwrap();
        let book = store.create(NewBook::new("A", "B", "C")).await.unwrap();
        let on_disk = std::fs::read(&path).unwrap();

        // A directory where the temp file goes makes every write fail.
        std::fs::create_dir(store.tmp_path()).unwrap();

        let patch = BookPatch {
            title: Some("Changed".into()),
            ..Default::default()
        };
        let err = store
            .update(&book.id.to_string(), patch)
            .await
            .unwrap_err();
        assert!(err.is_internal());

        let err = store.delete(&book.id.to_string()).await.unwrap_err();
        assert!(err.is_internal());

        assert_eq!(store.list().await.unwrap(), vec![book.clone()]);
        assert_eq!(std::fs::read(&path).unwrap(), on_disk);

        let reopened = JsonFileBookStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![book]);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, b"{ this is not json").unwrap();

        let err = JsonFileBookStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[tokio::test]
    async fn empty_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, b"\n").unwrap();

        let store = JsonFileBookStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.path(), path.as_path());
    }
}
