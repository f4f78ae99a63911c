pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshop_kernel::{InitCtx, Module};
use serde_json::json;

use service::AuthorService;

/// Authors keyed by a store-generated id
pub struct AuthorsModule {
    service: Arc<AuthorService>,
}

impl AuthorsModule {
    pub fn new(service: Arc<AuthorService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            first_id = ctx.settings.database.author_id_start,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let author = json!({ "$ref": "#/components/schemas/Author" });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let body = json!({
            "required": true,
            "content": { "application/json": { "schema": author } }
        });
        let ok = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": author } }
            })
        };
        let not_found = json!({
            "description": "Author not found",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create author",
                        "tags": ["Authors"],
                        "requestBody": body,
                        "responses": { "201": ok("Created author with generated id") }
                    },
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": author }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": { "200": ok("Author"), "404": not_found }
                    },
                    "put": {
                        "summary": "Replace author (never creates)",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": body,
                        "responses": { "200": ok("Replaced author"), "404": not_found }
                    },
                    "patch": {
                        "summary": "Merge supplied fields into author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": body,
                        "responses": { "200": ok("Merged author"), "404": not_found }
                    },
                    "delete": {
                        "summary": "Delete author and clear book references",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": { "204": { "description": "Deleted or already absent" } }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": ["integer", "null"],
                                "format": "int64",
                                "description": "Store-generated identifier; ignored on create"
                            },
                            "name": { "type": ["string", "null"] },
                            "age": { "type": ["integer", "null"], "format": "int32" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}
