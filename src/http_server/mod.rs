//! # HTTP Server Module
//!
//! Thin adapters between the wire and the record store.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/data/*` - JSON record API
//! - `/`, `/input`, `/display_all`, `/search_update`, `/update`, `/delete`,
//!   `/delete_by_name` - HTML forms

pub mod config;
pub mod data_routes;
pub mod errors;
pub mod form_routes;
pub mod html;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
pub use state::{AppState, DynStore};
