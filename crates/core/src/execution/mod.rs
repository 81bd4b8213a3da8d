//! External migration command execution.
//!
//! [`executor`] holds the request/result/error types and the
//! [`executor::GatedExecutor`] that ties command resolution, the
//! [`gate::ExecutionGate`] and [`subprocess::run_command`] together. Subprocess
//! management is pure (no HTTP) so it can be tested in isolation.

pub mod executor;
pub mod gate;
pub mod subprocess;
