//! Keyed entity persistence for the bookshop service.
//!
//! [`EntityStore`] is the contract resource services are written against.
//! [`InMemoryStore`] implements it over an ordered map, with either
//! caller-supplied (natural) keys or store-generated (surrogate) keys.

pub mod error;
pub mod memory;
pub mod page;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, KeyGenerator, KeyStrategy, Sequence};
pub use page::{Direction, Page, PageRequest, Sort};
pub use store::{Entity, EntityStore, SortKey};
