use std::sync::Arc;

use bookshop_db::EntityStore;

use super::models::AuthorEntity;
use crate::error::{CatalogError, CatalogResult};
use crate::modules::books::models::BookEntity;

/// Author lifecycle over a store that generates surrogate ids.
pub struct AuthorService {
    authors: Arc<dyn EntityStore<AuthorEntity>>,
    books: Arc<dyn EntityStore<BookEntity>>,
}

impl AuthorService {
    pub fn new(
        authors: Arc<dyn EntityStore<AuthorEntity>>,
        books: Arc<dyn EntityStore<BookEntity>>,
    ) -> Self {
        Self { authors, books }
    }

    /// Persist a new author. Any caller-supplied id is discarded.
    pub async fn create(&self, mut draft: AuthorEntity) -> CatalogResult<AuthorEntity> {
        draft.id = None;
        let saved = self.authors.save(draft).await?;
        tracing::info!(author_id = ?saved.id, "author created");
        Ok(saved)
    }

    pub async fn list(&self) -> CatalogResult<Vec<AuthorEntity>> {
        Ok(self.authors.list_all().await?)
    }

    pub async fn get(&self, id: i64) -> CatalogResult<AuthorEntity> {
        tracing::debug!(author_id = id, "loading author");
        self.authors
            .find_by_key(&id)
            .await?
            .ok_or_else(|| CatalogError::not_found("author", id))
    }

    pub async fn exists(&self, id: i64) -> CatalogResult<bool> {
        Ok(self.authors.exists_by_key(&id).await?)
    }

    /// Overwrite every field of an existing author with `draft`, absent fields included.
    /// Never creates.
    pub async fn replace(&self, id: i64, mut draft: AuthorEntity) -> CatalogResult<AuthorEntity> {
        if !self.exists(id).await? {
            return Err(CatalogError::not_found("author", id));
        }

        draft.id = Some(id);
        let saved = self.authors.save(draft).await?;
        tracing::info!(author_id = id, "author replaced");
        Ok(saved)
    }

    /// Merge the fields present in `partial` onto the stored author.
    pub async fn patch(&self, id: i64, partial: AuthorEntity) -> CatalogResult<AuthorEntity> {
        let mut existing = self.get(id).await?;
        existing.merge(partial);

        let saved = self.authors.save(existing).await?;
        tracing::info!(author_id = id, "author patched");
        Ok(saved)
    }

    /// Remove the author and clear it from every book that references it.
    /// Deleting a missing author succeeds.
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.authors.delete_by_key(&id).await?;

        let detached = self
            .books
            .update_matching(&|book: &mut BookEntity| {
                if book.author_id == Some(id) {
                    book.author_id = None;
                    true
                } else {
                    false
                }
            })
            .await?;

        tracing::info!(author_id = id, detached_books = detached, "author deleted");
        Ok(())
    }
}
