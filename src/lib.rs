//! crudstore - a file-backed person record service
//!
//! - `record`: the person record and collection types
//! - `storage`: persistence layer, one JSON document replaced atomically
//! - `store`: the record store, id allocation and serialized access
//! - `http_server`: JSON API and HTML forms over axum
//! - `cli`: `init`, `start` and `list` commands

pub mod cli;
pub mod http_server;
pub mod record;
pub mod storage;
pub mod store;
