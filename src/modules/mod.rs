pub mod authors;
pub mod books;

use std::sync::Arc;

use bookshop_db::{EntityStore, InMemoryStore, Sequence};
use bookshop_kernel::{
    settings::{DatabaseSettings, Settings},
    ModuleRegistry,
};

use authors::{models::AuthorEntity, service::AuthorService, AuthorsModule};
use books::{models::BookEntity, service::BookService, BooksModule};

/// Stores shared by the catalog services.
///
/// Both services see the same author store so book reads embed the author's
/// current state and author deletion can clear book references.
#[derive(Clone)]
pub struct CatalogStores {
    pub authors: Arc<dyn EntityStore<AuthorEntity>>,
    pub books: Arc<dyn EntityStore<BookEntity>>,
}

impl CatalogStores {
    pub fn in_memory(settings: &DatabaseSettings) -> Self {
        let authors: InMemoryStore<AuthorEntity> =
            InMemoryStore::with_generated_keys(Sequence::starting_at(settings.author_id_start));
        let books: InMemoryStore<BookEntity> = InMemoryStore::with_natural_keys();

        Self {
            authors: Arc::new(authors),
            books: Arc::new(books),
        }
    }
}

/// Register the authors and books modules, wired over `stores`
pub fn register_all(registry: &mut ModuleRegistry, stores: &CatalogStores, settings: &Settings) {
    let authors = AuthorService::new(stores.authors.clone(), stores.books.clone());
    let books = BookService::new(stores.books.clone(), stores.authors.clone());

    registry.register(Arc::new(AuthorsModule::new(Arc::new(authors))));
    registry.register(Arc::new(BooksModule::new(
        Arc::new(books),
        settings.pagination.clone(),
    )));
}
