//! Client side of the catalog: talks to `/api/books`, keeps a disposable
//! copy of the list with its edit buffers, and renders it as text.

pub mod api;
pub mod app;
pub mod state;
pub mod view;

pub use api::{ApiError, BookApi, BookGateway};
pub use app::CatalogApp;
pub use state::{BookDraft, CatalogState, EditSession, Field, LoadPhase};
