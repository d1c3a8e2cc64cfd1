//! Diagnostic sink for subprocess output

use tracing::{error, info};

/// Receives raw output chunks as they arrive from the subprocess
///
/// Zero or more calls per run, all before the runner resolves. Implement
/// this to surface live progress in a host application.
pub trait OutputSink: Send + Sync {
    /// A standard output chunk arrived
    fn output(&self, chunk: &str);

    /// A standard error or process-level error chunk arrived
    fn error(&self, chunk: &str);
}

/// Default sink forwarding chunks to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn output(&self, chunk: &str) {
        info!(target: "snaprun::process", "{chunk}");
    }

    fn error(&self, chunk: &str) {
        error!(target: "snaprun::process", "{chunk}");
    }
}
