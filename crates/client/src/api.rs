//! HTTP helper for the `/api/books` routes.

use async_trait::async_trait;
use libris_db::{Book, BookId, BookPatch, NewBook};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

/// Errors surfaced by a [`BookGateway`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// No response at all.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// A 2xx response whose body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong";

    /// Text to show the user: the server's message verbatim when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Decode(_) => Self::GENERIC_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations the client application needs from the catalog service.
#[async_trait]
pub trait BookGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, ApiError>;

    async fn get(&self, id: &BookId) -> Result<Book, ApiError>;

    async fn create(&self, book: &NewBook) -> Result<Book, ApiError>;

    async fn update(&self, id: &BookId, patch: &BookPatch) -> Result<Book, ApiError>;

    /// Returns the server's confirmation message.
    async fn delete(&self, id: &BookId) -> Result<String, ApiError>;
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed [`BookGateway`] rooted at the collection URL,
/// e.g. `http://localhost:3000/api/books`.
#[derive(Debug, Clone)]
pub struct BookApi {
    http: Client,
    base_url: String,
}

impl BookApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &BookId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl BookGateway for BookApi {
    async fn list(&self) -> Result<Vec<Book>, ApiError> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(ApiError::Network)?;
        handle_response(response).await
    }

    async fn get(&self, id: &BookId) -> Result<Book, ApiError> {
        let response = self
            .http
            .get(self.item_url(id))
            .send()
            .await
            .map_err(ApiError::Network)?;
        handle_response(response).await
    }

    async fn create(&self, book: &NewBook) -> Result<Book, ApiError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(book)
            .send()
            .await
            .map_err(ApiError::Network)?;
        handle_response(response).await
    }

    async fn update(&self, id: &BookId, patch: &BookPatch) -> Result<Book, ApiError> {
        let response = self
            .http
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await
            .map_err(ApiError::Network)?;
        handle_response(response).await
    }

    async fn delete(&self, id: &BookId) -> Result<String, ApiError> {
        let response = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(ApiError::Network)?;
        let body: MessageBody = handle_response(response).await?;
        Ok(body.message.unwrap_or_default())
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| ApiError::GENERIC_MESSAGE.to_string());

        tracing::debug!(status = status.as_u16(), %message, "catalog request rejected");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    response.json::<T>().await.map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let api = BookApi::new("http://localhost:3000/api/books/");
        assert_eq!(api.base_url(), "http://localhost:3000/api/books");

        let id: BookId = "0190a6a0-0000-7000-8000-000000000000".parse().unwrap();
        assert_eq!(
            api.item_url(&id),
            "http://localhost:3000/api/books/0190a6a0-0000-7000-8000-000000000000"
        );
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ApiError::Server {
            status: 400,
            message: "All fields are required".into(),
        };
        assert_eq!(err.user_message(), "All fields are required");
        assert_eq!(err.status(), Some(400));
    }
}
