use std::sync::Arc;

use bookshop_db::{EntityStore, Page, PageRequest};

use super::models::{BookDraft, BookEntity, BookRecord};
use crate::error::{CatalogError, CatalogResult};
use crate::modules::authors::models::AuthorEntity;

/// Book lifecycle over a store keyed by ISBN.
///
/// Books reference authors by id. A write never creates or modifies an author;
/// reads embed the author's current state.
pub struct BookService {
    books: Arc<dyn EntityStore<BookEntity>>,
    authors: Arc<dyn EntityStore<AuthorEntity>>,
}

impl BookService {
    pub fn new(
        books: Arc<dyn EntityStore<BookEntity>>,
        authors: Arc<dyn EntityStore<AuthorEntity>>,
    ) -> Self {
        Self { books, authors }
    }

    /// Create the book if `isbn` is unknown, otherwise replace it in full.
    /// `isbn` wins over any ISBN in `draft`. Returns whether it was created.
    pub async fn upsert(&self, isbn: &str, draft: BookDraft) -> CatalogResult<(BookRecord, bool)> {
        let author = self.resolve_author(draft.author).await?;
        let isbn = isbn.to_string();
        let created = !self.books.exists_by_key(&isbn).await?;

        let book = BookEntity {
            isbn,
            title: draft.title,
            author_id: author.as_ref().and_then(|a| a.id),
        };
        let saved = self.books.save(book).await?;

        tracing::info!(isbn = %saved.isbn, created, "book upserted");
        Ok((
            BookRecord {
                book: saved,
                author,
            },
            created,
        ))
    }

    pub async fn list(&self) -> CatalogResult<Vec<BookRecord>> {
        let mut records = Vec::new();
        for book in self.books.list_all().await? {
            records.push(self.hydrate(book).await?);
        }
        Ok(records)
    }

    pub async fn list_paged(&self, request: &PageRequest) -> CatalogResult<Page<BookRecord>> {
        tracing::debug!(page = request.page, size = request.size, "listing books");
        let page = self.books.list_paged(request).await?;

        let mut content = Vec::with_capacity(page.content.len());
        for book in page.content.iter().cloned() {
            content.push(self.hydrate(book).await?);
        }

        Ok(page.with_content(content))
    }

    pub async fn get(&self, isbn: &str) -> CatalogResult<BookRecord> {
        tracing::debug!(isbn, "loading book");
        let book = self.find(isbn).await?;
        self.hydrate(book).await
    }

    pub async fn exists(&self, isbn: &str) -> CatalogResult<bool> {
        Ok(self.books.exists_by_key(&isbn.to_string()).await?)
    }

    /// Merge the title and author reference present in `partial` onto the stored book.
    pub async fn patch(&self, isbn: &str, partial: BookDraft) -> CatalogResult<BookRecord> {
        let mut book = self.find(isbn).await?;

        if let Some(title) = partial.title {
            book.title = Some(title);
        }
        if let Some(author) = self.resolve_author(partial.author).await? {
            book.author_id = author.id;
        }

        let saved = self.books.save(book).await?;
        tracing::info!(isbn, "book patched");
        self.hydrate(saved).await
    }

    /// Deleting a missing book succeeds.
    pub async fn delete(&self, isbn: &str) -> CatalogResult<()> {
        self.books.delete_by_key(&isbn.to_string()).await?;
        tracing::info!(isbn, "book deleted");
        Ok(())
    }

    async fn find(&self, isbn: &str) -> CatalogResult<BookEntity> {
        self.books
            .find_by_key(&isbn.to_string())
            .await?
            .ok_or_else(|| CatalogError::not_found("book", isbn))
    }

    async fn hydrate(&self, book: BookEntity) -> CatalogResult<BookRecord> {
        let author = match book.author_id {
            Some(id) => self.authors.find_by_key(&id).await?,
            None => None,
        };
        Ok(BookRecord { book, author })
    }

    /// Turn an embedded author payload into the stored author it names.
    async fn resolve_author(
        &self,
        reference: Option<AuthorEntity>,
    ) -> CatalogResult<Option<AuthorEntity>> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let Some(id) = reference.id else {
            return Err(CatalogError::invalid_author("author.id is required"));
        };
        let stored = self
            .authors
            .find_by_key(&id)
            .await?
            .ok_or_else(|| CatalogError::invalid_author(format!("author {id} does not exist")))?;

        let mut mismatched = Vec::new();
        if reference.name.is_some() && reference.name != stored.name {
            mismatched.push("name");
        }
        if reference.age.is_some() && reference.age != stored.age {
            mismatched.push("age");
        }
        if !mismatched.is_empty() {
            return Err(CatalogError::AuthorMismatch {
                id,
                fields: mismatched,
            });
        }

        Ok(Some(stored))
    }
}
