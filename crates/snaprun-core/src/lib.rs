//! snaprun-core: Privileged snap package operations
//!
//! Builds snap install/remove command lines, runs them through the OS
//! privilege-elevation helper, and reports the terminal outcome together
//! with the captured output.

pub mod command;
pub mod error;
pub mod runner;
pub mod sink;
pub mod types;

pub use command::{ELEVATION_HELPER, SNAP_PROGRAM, install_args, remove_args};
pub use error::DescriptorError;
pub use runner::{PackageRunner, RunnerState};
pub use sink::{OutputSink, TracingSink};
pub use types::{Confinement, OperationKind, OutputLog, PackageDescriptor, RunOutcome, RunReport};
