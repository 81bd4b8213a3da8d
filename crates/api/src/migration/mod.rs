//! Migration service.
//!
//! The [`service::MigrationService`] wraps the core gated executor for HTTP
//! callers and is held in [`AppState`](crate::state::AppState).

pub mod service;
