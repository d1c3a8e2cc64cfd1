//! Package operation runner
//!
//! Drives one elevated subprocess from spawn to termination and resolves
//! with a [`RunReport`].

use std::sync::Arc;
use std::time::Instant;

use snaprun_exec::traits::{ProcessEvent, ProcessSpawner};
use tracing::{debug, error, instrument, warn};

use crate::command::{ELEVATION_HELPER, install_args, remove_args};
use crate::sink::{OutputSink, TracingSink};
use crate::types::{OperationKind, OutputLog, PackageDescriptor, RunOutcome, RunReport};

/// States of one runner instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Constructed, not yet started
    Idle,
    /// Composing the command line and asking the OS for a process
    Spawning,
    /// Process exists, stream listeners attached
    Running,
    /// Absorbing terminal state, report resolved
    Terminated,
}

impl std::fmt::Display for RunnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerState::Idle => write!(f, "idle"),
            RunnerState::Spawning => write!(f, "spawning"),
            RunnerState::Running => write!(f, "running"),
            RunnerState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Runs exactly one package operation
///
/// Owns the output log and a spawning capability. Not reusable: [`run`]
/// consumes the runner, so a new operation needs a new instance.
///
/// [`run`]: PackageRunner::run
pub struct PackageRunner {
    /// What to install or remove
    descriptor: PackageDescriptor,
    /// Which operation to run
    kind: OperationKind,
    /// Current state
    state: RunnerState,
    /// Captured output history
    log: OutputLog,
    /// Process spawning capability
    spawner: Arc<dyn ProcessSpawner>,
    /// Live output hook
    sink: Arc<dyn OutputSink>,
}

impl PackageRunner {
    /// Create a runner with the default tracing sink
    pub fn new(
        descriptor: PackageDescriptor,
        kind: OperationKind,
        spawner: Arc<dyn ProcessSpawner>,
    ) -> Self {
        Self {
            descriptor,
            kind,
            state: RunnerState::Idle,
            log: OutputLog::default(),
            spawner,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the output sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    fn transition_to(&mut self, next: RunnerState) {
        debug!(
            package = %self.descriptor.package_name,
            from = %self.state,
            to = %next,
            "state transition"
        );
        self.state = next;
    }

    /// Run the operation to completion
    ///
    /// Resolves exactly once, after the subprocess has fully terminated
    /// and its buffered output has been drained. Failures never escape as
    /// errors; they fold into the report's outcome and stderr log.
    #[instrument(
        skip(self),
        fields(package = %self.descriptor.package_name, operation = %self.kind)
    )]
    pub async fn run(mut self) -> RunReport {
        let start = Instant::now();

        self.transition_to(RunnerState::Spawning);
        let args = match self.kind {
            OperationKind::Install => install_args(&self.descriptor),
            OperationKind::Uninstall => remove_args(&self.descriptor),
        };
        debug!(helper = ELEVATION_HELPER, ?args, "spawning elevated process");

        let mut handle = match self.spawner.spawn(ELEVATION_HELPER, &args).await {
            Ok(handle) => handle,
            Err(e) => {
                // A failed spawn still resolves the terminal report.
                error!(error = %e, "failed to spawn elevated process");
                self.sink.error(&e.to_string());
                self.log.push_stderr(e.to_string());
                self.transition_to(RunnerState::Terminated);
                return self.report(RunOutcome::aborted(), start);
            }
        };
        self.transition_to(RunnerState::Running);

        let mut exit_code = None;
        while let Some(event) = handle.next_event().await {
            match event {
                ProcessEvent::Stdout(chunk) => {
                    self.sink.output(&chunk);
                    self.log.push_stdout(chunk);
                }
                ProcessEvent::Stderr(chunk) => {
                    self.sink.error(&chunk);
                    self.log.push_stderr(chunk);
                }
                ProcessEvent::Error(message) => {
                    // Not terminal on its own; a close event normally
                    // follows, so keep draining.
                    self.sink.error(&message);
                    self.log.push_stderr(message);
                }
                ProcessEvent::Closed(code) => {
                    exit_code = Some(code);
                }
            }
        }
        self.transition_to(RunnerState::Terminated);

        let outcome = match exit_code {
            Some(code) => RunOutcome::from_exit_code(code),
            // Stream ended without a close event: the process never
            // terminated normally. Treat as abnormal termination rather
            // than waiting forever.
            None => RunOutcome::aborted(),
        };
        if !outcome.success {
            warn!(exit_code = ?outcome.exit_code, "process exited with failure");
        }

        self.report(outcome, start)
    }

    fn report(self, outcome: RunOutcome, start: Instant) -> RunReport {
        RunReport {
            descriptor: self.descriptor,
            kind: self.kind,
            outcome,
            log: self.log,
            duration: start.elapsed(),
        }
    }
}
