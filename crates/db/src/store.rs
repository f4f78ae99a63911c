use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::page::{Page, PageRequest};

/// Comparable projection of an entity property, used for sorted listings.
///
/// Absent values order before any present value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Null,
    Int(i64),
    Text(String),
}

impl From<Option<i64>> for SortKey {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SortKey::Null, SortKey::Int)
    }
}

impl From<Option<&str>> for SortKey {
    fn from(value: Option<&str>) -> Self {
        value.map_or(SortKey::Null, |text| SortKey::Text(text.to_string()))
    }
}

/// A persistable record identified by a single key.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Clone + Ord + Debug + Send + Sync + 'static;

    /// Name used in logs and error messages.
    const NAME: &'static str;

    /// Properties accepted by [`Entity::sort_key`].
    const SORTABLE: &'static [&'static str];

    fn key(&self) -> Option<&Self::Key>;

    fn set_key(&mut self, key: Self::Key);

    /// Value of `property` for ordering; only called with names from [`Entity::SORTABLE`].
    fn sort_key(&self, property: &str) -> SortKey;
}

/// Generic keyed persistence contract.
///
/// Implementations serialize concurrent writers to the same key themselves;
/// the last write wins.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Upsert. Assigns a key when the entity has none and the store generates keys.
    /// Returns the entity as persisted.
    async fn save(&self, entity: E) -> StoreResult<E>;

    async fn find_by_key(&self, key: &E::Key) -> StoreResult<Option<E>>;

    async fn exists_by_key(&self, key: &E::Key) -> StoreResult<bool>;

    /// Removing an absent key is not an error.
    async fn delete_by_key(&self, key: &E::Key) -> StoreResult<()>;

    /// Every entity, in store order.
    async fn list_all(&self) -> StoreResult<Vec<E>>;

    async fn list_paged(&self, request: &PageRequest) -> StoreResult<Page<E>>;

    /// Apply `update` to every stored entity in one atomic step. `update` returns
    /// whether it changed the entity; the number of changed entities is returned.
    /// Keys must not be changed.
    async fn update_matching(
        &self,
        update: &(dyn for<'a> Fn(&'a mut E) -> bool + Send + Sync),
    ) -> StoreResult<usize>;
}
