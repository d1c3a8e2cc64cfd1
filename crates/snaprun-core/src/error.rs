//! Error types for snaprun-core

use thiserror::Error;

/// Errors raised when constructing a package descriptor
///
/// Runtime failures never surface as errors; they are folded into the
/// [`crate::types::RunReport`] the runner resolves with.
#[derive(Error, Debug, Clone)]
pub enum DescriptorError {
    /// Package name was empty
    #[error("package name must not be empty")]
    EmptyPackageName,
}
