//! Record store
//!
//! Sits in front of the persistence layer and owns the rules:
//! - ids are positive, unique, and allocated as `max + 1`
//! - an id is never issued twice by the same store
//! - update merges shallowly and never touches `id`
//! - concurrent operations never interleave their load and save steps
//!
//! The store is generic over [`Storage`](crate::storage::Storage) and knows
//! nothing about the medium behind it.

mod errors;
mod filter;
mod record_store;

pub use errors::{StoreError, StoreResult};
pub use filter::NameFilter;
pub use record_store::RecordStore;
