//! Error types for snaprun-exec

use thiserror::Error;

/// Errors that can occur while spawning a process
///
/// Failures after a successful spawn are delivered as stream events, not
/// call errors, so this stays small.
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// The OS could not create the process
    #[error("failed to spawn process: {0}")]
    SpawnError(String),
}
