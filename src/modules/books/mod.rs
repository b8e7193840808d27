pub mod models;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use routes::SharedStore;

/// Catalog module serving the book collection under `/api/books`
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self
            .store
            .list()
            .await
            .context("failed to read the book catalog")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.store.backend,
            books = books.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string", "format": "uuid" }
        });
        let string_field = |description: &str| {
            json!({ "type": "string", "description": description })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, newest first",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Created book"),
                            "400": error("Missing or blank field"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": book("The book"),
                            "400": error("Malformed id"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update some fields of a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book("Updated book"),
                            "400": error("Malformed id or blank field"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/DeleteConfirmation" }
                                    }
                                }
                            },
                            "400": error("Malformed id"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "format": "uuid",
                                "description": "Unique identifier for the book"
                            },
                            "title": string_field("Title of the book"),
                            "author": string_field("Author of the book"),
                            "category": string_field("Shelf category of the book"),
                            "createdAt": {
                                "type": "string",
                                "format": "date-time",
                                "description": "When the book was added"
                            },
                            "updatedAt": {
                                "type": "string",
                                "format": "date-time",
                                "description": "When the book was last changed"
                            }
                        },
                        "required": ["id", "title", "author", "category", "createdAt", "updatedAt"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": string_field("Title of the book"),
                            "author": string_field("Author of the book"),
                            "category": string_field("Shelf category of the book")
                        },
                        "required": ["title", "author", "category"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": string_field("New title"),
                            "author": string_field("New author"),
                            "category": string_field("New category")
                        }
                    },
                    "DeleteConfirmation": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
