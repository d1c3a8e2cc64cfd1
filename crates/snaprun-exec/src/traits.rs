//! Process spawner trait and event-stream types

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ExecError;

/// One observable event from a spawned process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// Chunk of standard output
    Stdout(String),
    /// Chunk of standard error
    Stderr(String),
    /// Process-level failure while driving the child (not terminal by itself)
    Error(String),
    /// Terminal event: exit code, or `None` when killed by a signal
    Closed(Option<i32>),
}

/// Handle to a running process's merged event stream
///
/// Events arrive in per-stream order. Implementations must deliver all
/// buffered stdout/stderr chunks before `Closed`; the stream ending without
/// a `Closed` event means the process did not terminate normally.
pub struct ProcessHandle {
    events: mpsc::Receiver<ProcessEvent>,
}

impl ProcessHandle {
    /// Wrap a receiver carrying the process's events
    #[must_use]
    pub fn new(events: mpsc::Receiver<ProcessEvent>) -> Self {
        Self { events }
    }

    /// Next event, or `None` once the stream has ended
    pub async fn next_event(&mut self) -> Option<ProcessEvent> {
        self.events.recv().await
    }
}

/// Capability to spawn an observable subprocess
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Start `program` with `args`, returning a handle to its event stream
    async fn spawn(&self, program: &str, args: &[String]) -> Result<ProcessHandle, ExecError>;

    /// Short identifier for logging
    fn spawner_type(&self) -> &'static str;
}
