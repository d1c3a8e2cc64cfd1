//! Type definitions for package operations

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// Sandboxing policy applied to an installed package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confinement {
    /// Default strict confinement, no extra flag
    #[default]
    None,
    /// Developer mode, relaxed sandboxing
    Devmode,
    /// Classic confinement, full system access
    Classic,
}

impl From<&str> for Confinement {
    /// Unrecognized values fall back to `None`; the package manager gets
    /// no confinement flag for those.
    fn from(value: &str) -> Self {
        match value {
            "devmode" => Confinement::Devmode,
            "classic" => Confinement::Classic,
            _ => Confinement::None,
        }
    }
}

impl std::fmt::Display for Confinement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confinement::None => write!(f, "none"),
            Confinement::Devmode => write!(f, "devmode"),
            Confinement::Classic => write!(f, "classic"),
        }
    }
}

/// Which package operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Install a package
    Install,
    /// Remove an installed package
    Uninstall,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Install => write!(f, "install"),
            OperationKind::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// Identifies one package operation's target
///
/// Immutable for the duration of an operation. The channel is passed
/// through to the package manager verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name as understood by the package manager
    pub package_name: String,
    /// Release track, e.g. "stable"
    pub channel: String,
    /// Sandboxing policy for install
    pub confinement: Confinement,
}

impl PackageDescriptor {
    /// Create a descriptor with default confinement
    ///
    /// # Errors
    /// Returns [`DescriptorError::EmptyPackageName`] if `name` is empty.
    pub fn new(
        name: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self, DescriptorError> {
        let package_name = name.into();
        if package_name.is_empty() {
            return Err(DescriptorError::EmptyPackageName);
        }
        Ok(Self {
            package_name,
            channel: channel.into(),
            confinement: Confinement::None,
        })
    }

    /// Set the confinement mode
    #[must_use]
    pub fn with_confinement(mut self, confinement: Confinement) -> Self {
        self.confinement = confinement;
        self
    }
}

/// Terminal outcome of one package operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// True iff the process exited with code 0
    pub success: bool,
    /// Exit code, or `None` when the process did not exit normally
    pub exit_code: Option<i32>,
}

impl RunOutcome {
    /// Outcome from an observed exit code
    #[must_use]
    pub fn from_exit_code(exit_code: Option<i32>) -> Self {
        Self {
            success: exit_code == Some(0),
            exit_code,
        }
    }

    /// Outcome for a process that never terminated normally (spawn failure
    /// or a process-level error with no close event)
    #[must_use]
    pub fn aborted() -> Self {
        Self {
            success: false,
            exit_code: None,
        }
    }
}

/// Captured subprocess output, split by stream
///
/// Append-only for the lifetime of one run; chunks keep arrival order
/// within each stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputLog {
    /// Standard output chunks
    pub stdout: Vec<String>,
    /// Standard error chunks, including process-level error text
    pub stderr: Vec<String>,
}

impl OutputLog {
    /// Append a standard output chunk
    pub fn push_stdout(&mut self, chunk: impl Into<String>) {
        self.stdout.push(chunk.into());
    }

    /// Append a standard error chunk
    pub fn push_stderr(&mut self, chunk: impl Into<String>) {
        self.stderr.push(chunk.into());
    }
}

/// Terminal report for one package operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The descriptor the operation ran for
    pub descriptor: PackageDescriptor,
    /// Which operation ran
    pub kind: OperationKind,
    /// Terminal outcome
    pub outcome: RunOutcome,
    /// Captured output history
    pub log: OutputLog,
    /// Wall-clock time from spawn attempt to termination
    pub duration: Duration,
}
