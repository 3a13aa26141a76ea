pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{settings::CatalogSettings, InitCtx, Module};
use serde_json::{json, Value};

use models::seed_books;
use store::BookStore;

/// Catalog module: owns the book store and serves the CRUD endpoints at the server root.
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }

    /// Module with a store built from catalog settings.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let books = if settings.seed { seed_books() } else { Vec::new() };
        Self::new(BookStore::with_books(books, settings.id_strategy))
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        String::new()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            id_strategy = ?self.store.id_strategy(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped, catalog discarded"
        );
        Ok(())
    }
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> Value {
    json_response(description, json!({ "$ref": "#/components/schemas/ErrorResponse" }))
}

fn book_list_response() -> Value {
    json_response(
        "Books in catalog order",
        json!({ "type": "array", "items": { "$ref": "#/components/schemas/Book" } }),
    )
}

fn integer_param(name: &str, location: &str, minimum: i64, maximum: Option<i64>) -> Value {
    let mut schema = json!({ "type": "integer", "format": "int64", "minimum": minimum });
    if let Some(maximum) = maximum {
        schema["maximum"] = json!(maximum);
    }
    json!({ "name": name, "in": location, "required": true, "schema": schema })
}

fn book_request_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookRequest" }
            }
        }
    })
}

fn book_properties() -> Value {
    json!({
        "id": { "type": "integer", "format": "int64" },
        "title": { "type": "string", "minLength": 3 },
        "author": { "type": "string", "minLength": 1 },
        "description": { "type": "string", "minLength": 1, "maxLength": 100 },
        "published_date": { "type": "integer", "format": "int64", "minimum": 2000, "maximum": 2030 },
        "rating": { "type": "integer", "format": "int64", "minimum": 0, "maximum": 5 }
    })
}

fn openapi_fragment() -> Value {
    let book_id = integer_param("book_id", "path", 1, None);

    json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List every book",
                    "tags": ["Books"],
                    "responses": { "200": book_list_response() }
                }
            },
            "/books/": {
                "get": {
                    "summary": "Books with an exact rating",
                    "tags": ["Books"],
                    "parameters": [integer_param("book_rating", "query", 0, Some(5))],
                    "responses": {
                        "200": book_list_response(),
                        "422": error_response("Invalid rating")
                    }
                }
            },
            "/books/publish/": {
                "get": {
                    "summary": "Books published in a year",
                    "tags": ["Books"],
                    "parameters": [integer_param("published_date", "query", 2000, Some(2030))],
                    "responses": {
                        "200": book_list_response(),
                        "422": error_response("Invalid year")
                    }
                }
            },
            "/books/{book_id}": {
                "get": {
                    "summary": "Book by id",
                    "tags": ["Books"],
                    "parameters": [book_id.clone()],
                    "responses": {
                        "200": json_response("The book", json!({ "$ref": "#/components/schemas/Book" })),
                        "404": error_response("Item not found"),
                        "422": error_response("Invalid id")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("Item not found"),
                        "422": error_response("Invalid id")
                    }
                }
            },
            "/books/update_book": {
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "requestBody": book_request_body(),
                    "responses": {
                        "204": { "description": "Updated" },
                        "404": error_response("Item not found"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/create-book": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": book_request_body(),
                    "responses": {
                        "201": { "description": "Created" },
                        "422": error_response("Validation error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book_properties(),
                    "required": ["id", "title", "author", "description", "published_date", "rating"]
                },
                "BookRequest": {
                    "type": "object",
                    "properties": book_properties(),
                    "required": ["title", "author", "description", "published_date", "rating"],
                    "example": {
                        "title": "A new book",
                        "author": "elMonsi",
                        "description": "A new book description",
                        "published_date": 2023,
                        "rating": 5
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(settings: &CatalogSettings) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::from_settings(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::settings::{IdStrategy, Settings};

    #[tokio::test]
    async fn seeding_follows_settings() {
        let seeded = BooksModule::from_settings(&CatalogSettings::default());
        assert_eq!(seeded.store().len().await, 6);

        let empty = BooksModule::from_settings(&CatalogSettings {
            seed: false,
            id_strategy: IdStrategy::AfterLast,
        });
        assert!(empty.store().is_empty().await);
        assert_eq!(empty.store().id_strategy(), IdStrategy::AfterLast);
    }

    #[tokio::test]
    async fn lifecycle_hooks_succeed() {
        let module = BooksModule::from_settings(&CatalogSettings::default());
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        module.init(&ctx).await.unwrap();
        module.start(&ctx).await.unwrap();
        module.stop().await.unwrap();
    }

    #[test]
    fn mounts_at_root_and_documents_every_route() {
        let module = BooksModule::from_settings(&CatalogSettings::default());
        assert_eq!(module.base_path(), "");

        let spec = module.openapi().unwrap();
        for path in [
            "/books",
            "/books/",
            "/books/publish/",
            "/books/{book_id}",
            "/books/update_book",
            "/create-book",
        ] {
            assert!(spec["paths"][path].is_object(), "{path} is undocumented");
        }
        assert_eq!(
            spec["paths"]["/books/{book_id}"]["delete"]["parameters"][0]["schema"]["minimum"],
            1
        );
    }
}
