use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::page::{Direction, Page, PageRequest};
use crate::store::{Entity, EntityStore};

/// Source of fresh surrogate keys.
pub trait KeyGenerator<K>: Send + Sync {
    fn next_key(&self) -> K;
}

/// Monotonically increasing `i64` sequence.
#[derive(Debug)]
pub struct Sequence(AtomicI64);

impl Sequence {
    pub fn starting_at(first: i64) -> Self {
        Self(AtomicI64::new(first))
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl KeyGenerator<i64> for Sequence {
    fn next_key(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// How a store obtains the key of an entity saved without one.
pub enum KeyStrategy<K> {
    /// The caller always supplies the key.
    Natural,
    /// The store assigns one from the generator.
    Generated(Box<dyn KeyGenerator<K>>),
}

/// An [`EntityStore`] kept in memory, ordered by key.
///
/// Store order is ascending key order, which for a [`Sequence`] is creation order.
pub struct InMemoryStore<E: Entity> {
    records: RwLock<BTreeMap<E::Key, E>>,
    keys: KeyStrategy<E::Key>,
}

impl<E: Entity> InMemoryStore<E> {
    /// Store whose entities carry caller-supplied keys.
    pub fn with_natural_keys() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            keys: KeyStrategy::Natural,
        }
    }

    /// Store that assigns keys to entities saved without one.
    pub fn with_generated_keys(generator: impl KeyGenerator<E::Key> + 'static) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            keys: KeyStrategy::Generated(Box::new(generator)),
        }
    }

    fn next_key(&self, records: &BTreeMap<E::Key, E>) -> StoreResult<E::Key> {
        match &self.keys {
            KeyStrategy::Natural => Err(StoreError::MissingKey { entity: E::NAME }),
            KeyStrategy::Generated(generator) => loop {
                // Skip keys taken by explicit saves.
                let key = generator.next_key();
                if !records.contains_key(&key) {
                    return Ok(key);
                }
            },
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryStore<E> {
    async fn save(&self, mut entity: E) -> StoreResult<E> {
        let mut records = self.records.write().await;

        let key = match entity.key() {
            Some(key) => key.clone(),
            None => {
                let key = self.next_key(&records)?;
                entity.set_key(key.clone());
                key
            }
        };

        tracing::trace!(entity = E::NAME, key = ?key, "saving record");
        records.insert(key, entity.clone());
        Ok(entity)
    }

    async fn find_by_key(&self, key: &E::Key) -> StoreResult<Option<E>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn exists_by_key(&self, key: &E::Key) -> StoreResult<bool> {
        Ok(self.records.read().await.contains_key(key))
    }

    async fn delete_by_key(&self, key: &E::Key) -> StoreResult<()> {
        if self.records.write().await.remove(key).is_some() {
            tracing::trace!(entity = E::NAME, key = ?key, "deleted record");
        }
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<E>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn list_paged(&self, request: &PageRequest) -> StoreResult<Page<E>> {
        let mut all = self.list_all().await?;

        if let Some(sort) = &request.sort {
            if !E::SORTABLE.contains(&sort.property.as_str()) {
                return Err(StoreError::UnsortableProperty {
                    entity: E::NAME,
                    property: sort.property.clone(),
                });
            }
            all.sort_by(|a, b| {
                let ordering = a
                    .sort_key(&sort.property)
                    .cmp(&b.sort_key(&sort.property));
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        Ok(Page::slice(all, request))
    }

    async fn update_matching(
        &self,
        update: &(dyn for<'a> Fn(&'a mut E) -> bool + Send + Sync),
    ) -> StoreResult<usize> {
        let mut records = self.records.write().await;
        let mut changed = 0;
        for entity in records.values_mut() {
            if update(entity) {
                changed += 1;
            }
        }
        tracing::trace!(entity = E::NAME, changed, "updated matching records");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Sort;
    use crate::store::SortKey;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<i64>,
        body: Option<String>,
    }

    impl Entity for Note {
        type Key = i64;
        const NAME: &'static str = "note";
        const SORTABLE: &'static [&'static str] = &["id", "body"];

        fn key(&self) -> Option<&i64> {
            self.id.as_ref()
        }

        fn set_key(&mut self, key: i64) {
            self.id = Some(key);
        }

        fn sort_key(&self, property: &str) -> SortKey {
            match property {
                "id" => self.id.into(),
                _ => self.body.as_deref().into(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        label: String,
    }

    impl Entity for Tag {
        type Key = String;
        const NAME: &'static str = "tag";
        const SORTABLE: &'static [&'static str] = &["label"];

        fn key(&self) -> Option<&String> {
            Some(&self.label)
        }

        fn set_key(&mut self, key: String) {
            self.label = key;
        }

        fn sort_key(&self, _property: &str) -> SortKey {
            SortKey::Text(self.label.clone())
        }
    }

    fn note(body: &str) -> Note {
        Note {
            id: None,
            body: Some(body.to_string()),
        }
    }

    #[tokio::test]
    async fn generated_keys_are_unique_and_increasing() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        let a = store.save(note("a")).await.unwrap();
        let b = store.save(note("b")).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert!(store.exists_by_key(&1).await.unwrap());
    }

    #[tokio::test]
    async fn generator_skips_keys_already_taken() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::starting_at(5));
        store
            .save(Note {
                id: Some(5),
                body: None,
            })
            .await
            .unwrap();

        let saved = store.save(note("next")).await.unwrap();
        assert_eq!(saved.id, Some(6));
    }

    #[tokio::test]
    async fn save_with_key_overwrites() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        let saved = store.save(note("first")).await.unwrap();
        store
            .save(Note {
                id: saved.id,
                body: None,
            })
            .await
            .unwrap();

        let found = store.find_by_key(&1).await.unwrap().unwrap();
        assert_eq!(found.body, None);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn natural_key_store_keeps_caller_key() {
        let store: InMemoryStore<Tag> = InMemoryStore::with_natural_keys();
        let saved = store
            .save(Tag {
                label: "rust".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(saved.label, "rust");
        assert!(store.exists_by_key(&"rust".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn natural_key_store_rejects_keyless_save() {
        let store: InMemoryStore<Note> = InMemoryStore::with_natural_keys();
        let err = store.save(note("orphan")).await.unwrap_err();
        assert_eq!(err, StoreError::MissingKey { entity: "note" });
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        store.save(note("gone")).await.unwrap();

        store.delete_by_key(&1).await.unwrap();
        store.delete_by_key(&1).await.unwrap();
        store.delete_by_key(&42).await.unwrap();

        assert!(store.find_by_key(&1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_matching_changes_only_selected_records() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        for body in ["keep", "drop", "drop"] {
            store.save(note(body)).await.unwrap();
        }

        let changed = store
            .update_matching(&|note: &mut Note| {
                if note.body.as_deref() == Some("drop") {
                    note.body = None;
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap();

        assert_eq!(changed, 2);
        let bodies: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.body)
            .collect();
        assert_eq!(bodies, vec![Some("keep".to_string()), None, None]);
    }

    #[tokio::test]
    async fn paged_listing_follows_store_order() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        for body in ["c", "a", "b", "d", "e"] {
            store.save(note(body)).await.unwrap();
        }

        let page = store.list_paged(&PageRequest::new(0, 2)).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|n| n.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn paged_listing_sorts_descending() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        for body in ["c", "a", "b"] {
            store.save(note(body)).await.unwrap();
        }
        store
            .save(Note {
                id: None,
                body: None,
            })
            .await
            .unwrap();

        let request = PageRequest::new(0, 10).with_sort(Sort::desc("body"));
        let page = store.list_paged(&request).await.unwrap();
        let bodies: Vec<_> = page.content.iter().map(|n| n.body.clone()).collect();
        assert_eq!(
            bodies,
            vec![
                Some("c".to_string()),
                Some("b".to_string()),
                Some("a".to_string()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn sorting_by_unknown_property_fails() {
        let store: InMemoryStore<Note> = InMemoryStore::with_generated_keys(Sequence::default());
        let request = PageRequest::new(0, 10).with_sort(Sort::asc("colour"));
        let err = store.list_paged(&request).await.unwrap_err();
        assert!(matches!(err, StoreError::UnsortableProperty { .. }));
    }
}
