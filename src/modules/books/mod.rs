pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshop_kernel::{settings::PaginationSettings, InitCtx, Module};
use serde_json::json;

use service::BookService;

/// Books keyed by ISBN, referencing authors by id
pub struct BooksModule {
    service: Arc<BookService>,
    pagination: PaginationSettings,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>, pagination: PaginationSettings) -> Self {
        Self {
            service,
            pagination,
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            default_page_size = self.pagination.default_page_size,
            max_page_size = self.pagination.max_page_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone(), self.pagination.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book = json!({ "$ref": "#/components/schemas/Book" });
        let error = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        });
        let isbn_param = json!({
            "name": "isbn",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let body = json!({
            "required": true,
            "content": { "application/json": { "schema": book } }
        });
        let ok = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": book } }
            })
        };
        let failure = |description: &str| json!({ "description": description, "content": error });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books one page at a time",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer", "minimum": 0 } },
                            { "name": "size", "in": "query", "schema": { "type": "integer", "minimum": 1 } },
                            {
                                "name": "sort",
                                "in": "query",
                                "description": "property[,asc|desc] where property is isbn or title",
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Page of books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookPage" }
                                    }
                                }
                            },
                            "400": failure("Malformed paging or sort parameters")
                        }
                    }
                },
                "/{isbn}": {
                    "put": {
                        "summary": "Create or replace book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "requestBody": body,
                        "responses": {
                            "200": ok("Replaced book"),
                            "201": ok("Created book"),
                            "409": failure("Embedded author disagrees with the stored author"),
                            "422": failure("Author reference lacks an id or names an unknown author")
                        }
                    },
                    "get": {
                        "summary": "Get book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": { "200": ok("Book"), "404": failure("Book not found") }
                    },
                    "patch": {
                        "summary": "Merge title and author reference into book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "requestBody": body,
                        "responses": {
                            "200": ok("Merged book"),
                            "404": failure("Book not found"),
                            "409": failure("Embedded author disagrees with the stored author"),
                            "422": failure("Author reference lacks an id or names an unknown author")
                        }
                    },
                    "delete": {
                        "summary": "Delete book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": { "204": { "description": "Deleted or already absent" } }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": ["string", "null"],
                                "description": "Natural key; the path segment wins on writes"
                            },
                            "title": { "type": ["string", "null"] },
                            "author": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/Author" },
                                    { "type": "null" }
                                ]
                            }
                        }
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "array", "items": book },
                            "pageNumber": { "type": "integer" },
                            "pageSize": { "type": "integer" },
                            "totalElements": { "type": "integer" },
                            "totalPages": { "type": "integer" },
                            "numberOfElements": { "type": "integer" },
                            "first": { "type": "boolean" },
                            "last": { "type": "boolean" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}
