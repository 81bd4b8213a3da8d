//! `migrator-core` -- pure domain logic for the keyspace migrator.
//!
//! Two independent halves live here:
//!
//! - [`interpolate`]: walks a template tree and stamps `${key}` placeholders
//!   with configuration values.
//! - [`execution`]: runs the external migration binary behind a single
//!   process-wide [`execution::gate::ExecutionGate`].
//!
//! Nothing in this crate knows about HTTP; the `api` crate wires it up.

pub mod error;
pub mod execution;
pub mod interpolate;
