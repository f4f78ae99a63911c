//! Storage-layer failures.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} cannot be saved without a key")]
    MissingKey { entity: &'static str },

    #[error("{entity} cannot be sorted by '{property}'")]
    UnsortableProperty {
        entity: &'static str,
        property: String,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
