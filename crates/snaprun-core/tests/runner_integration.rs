use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use snaprun_core::{
    Confinement, OperationKind, OutputSink, PackageDescriptor, PackageRunner, RunOutcome,
};
use snaprun_exec::error::ExecError;
use snaprun_exec::traits::{ProcessEvent, ProcessHandle, ProcessSpawner};

// Mock implementations

/// Spawner replaying a fixed event script, recording what it was asked to run
struct ScriptedSpawner {
    events: Vec<ProcessEvent>,
    invocations: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedSpawner {
    fn new(events: Vec<ProcessEvent>) -> Self {
        Self {
            events,
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessSpawner for ScriptedSpawner {
    async fn spawn(&self, program: &str, args: &[String]) -> Result<ProcessHandle, ExecError> {
        self.invocations
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in self.events.clone() {
            tx.send(event).await.unwrap();
        }
        // Sender drops here; the stream ends after the scripted events.
        Ok(ProcessHandle::new(rx))
    }

    fn spawner_type(&self) -> &'static str {
        "scripted"
    }
}

/// Spawner that always fails to create the process
struct FailingSpawner;

#[async_trait]
impl ProcessSpawner for FailingSpawner {
    async fn spawn(&self, _program: &str, _args: &[String]) -> Result<ProcessHandle, ExecError> {
        Err(ExecError::SpawnError("pkexec not found".to_string()))
    }

    fn spawner_type(&self) -> &'static str {
        "failing"
    }
}

/// Sink collecting forwarded chunks for assertions
#[derive(Default)]
struct CollectingSink {
    output: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl OutputSink for CollectingSink {
    fn output(&self, chunk: &str) {
        self.output.lock().unwrap().push(chunk.to_string());
    }

    fn error(&self, chunk: &str) {
        self.errors.lock().unwrap().push(chunk.to_string());
    }
}

fn descriptor() -> PackageDescriptor {
    PackageDescriptor::new("spotify", "stable").unwrap()
}

fn args_of(strs: &[&str]) -> Vec<String> {
    strs.iter().map(|s| (*s).to_string()).collect()
}

// Tests

#[tokio::test]
async fn test_install_success_collects_output_in_order() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![
        ProcessEvent::Stdout("A".to_string()),
        ProcessEvent::Stdout("B".to_string()),
        ProcessEvent::Closed(Some(0)),
    ]));

    let report = PackageRunner::new(descriptor(), OperationKind::Install, spawner.clone())
        .run()
        .await;

    assert_eq!(report.outcome, RunOutcome::from_exit_code(Some(0)));
    assert!(report.outcome.success);
    assert_eq!(report.log.stdout, vec!["A", "B"]);
    assert!(report.log.stderr.is_empty());

    // Exactly one elevated invocation, with the full install command line
    assert_eq!(
        spawner.invocations(),
        vec![(
            "pkexec".to_string(),
            args_of(&["snap", "install", "--stable", "spotify"]),
        )]
    );
}

#[tokio::test]
async fn test_install_passes_confinement_flag() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![ProcessEvent::Closed(Some(0))]));
    let descriptor = descriptor().with_confinement(Confinement::Classic);

    PackageRunner::new(descriptor, OperationKind::Install, spawner.clone())
        .run()
        .await;

    assert_eq!(
        spawner.invocations()[0].1,
        args_of(&["snap", "install", "--stable", "--classic", "spotify"]),
    );
}

#[tokio::test]
async fn test_uninstall_spawns_remove_command() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![ProcessEvent::Closed(Some(0))]));
    let descriptor = PackageDescriptor::new("spotify", "edge")
        .unwrap()
        .with_confinement(Confinement::Devmode);

    let report = PackageRunner::new(descriptor, OperationKind::Uninstall, spawner.clone())
        .run()
        .await;

    assert!(report.outcome.success);
    // Channel and confinement are ignored for removal
    assert_eq!(
        spawner.invocations(),
        vec![("pkexec".to_string(), args_of(&["snap", "remove", "spotify"]))]
    );
}

#[tokio::test]
async fn test_nonzero_exit_reports_failure() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![
        ProcessEvent::Stderr("error: snap not found".to_string()),
        ProcessEvent::Closed(Some(1)),
    ]));

    let report = PackageRunner::new(descriptor(), OperationKind::Install, spawner)
        .run()
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.exit_code, Some(1));
    assert_eq!(report.log.stderr, vec!["error: snap not found"]);
}

#[tokio::test]
async fn test_signal_kill_reports_no_exit_code() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![ProcessEvent::Closed(None)]));

    let report = PackageRunner::new(descriptor(), OperationKind::Install, spawner)
        .run()
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.exit_code, None);
}

#[tokio::test]
async fn test_error_without_close_still_resolves() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![ProcessEvent::Error(
        "authorization dialog dismissed".to_string(),
    )]));
    let runner = PackageRunner::new(descriptor(), OperationKind::Install, spawner);

    // Must not hang waiting for a close event that never comes
    let report = tokio::time::timeout(Duration::from_secs(1), runner.run())
        .await
        .expect("runner hung on error without close");

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.exit_code, None);
    assert_eq!(report.log.stderr, vec!["authorization dialog dismissed"]);
}

#[tokio::test]
async fn test_spawn_failure_resolves_with_aborted_outcome() {
    let report = PackageRunner::new(descriptor(), OperationKind::Install, Arc::new(FailingSpawner))
        .run()
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.exit_code, None);
    assert_eq!(report.log.stderr.len(), 1);
    assert!(report.log.stderr[0].contains("pkexec not found"));
}

#[tokio::test]
async fn test_streams_are_logged_separately_in_arrival_order() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![
        ProcessEvent::Stdout("fetching".to_string()),
        ProcessEvent::Stderr("warning: slow mirror".to_string()),
        ProcessEvent::Stdout("mounting".to_string()),
        ProcessEvent::Error("transient I/O hiccup".to_string()),
        ProcessEvent::Closed(Some(0)),
    ]));

    let report = PackageRunner::new(descriptor(), OperationKind::Install, spawner)
        .run()
        .await;

    assert!(report.outcome.success);
    assert_eq!(report.log.stdout, vec!["fetching", "mounting"]);
    // Process-level errors land in the stderr log after the stderr chunks
    assert_eq!(
        report.log.stderr,
        vec!["warning: slow mirror", "transient I/O hiccup"]
    );
}

#[tokio::test]
async fn test_sink_receives_live_chunks() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![
        ProcessEvent::Stdout("downloading".to_string()),
        ProcessEvent::Stderr("warning".to_string()),
        ProcessEvent::Closed(Some(0)),
    ]));
    let sink = Arc::new(CollectingSink::default());

    PackageRunner::new(descriptor(), OperationKind::Install, spawner)
        .with_sink(sink.clone())
        .run()
        .await;

    assert_eq!(*sink.output.lock().unwrap(), vec!["downloading"]);
    assert_eq!(*sink.errors.lock().unwrap(), vec!["warning"]);
}

#[tokio::test]
async fn test_report_returns_owning_context() {
    let spawner = Arc::new(ScriptedSpawner::new(vec![ProcessEvent::Closed(Some(0))]));
    let descriptor = PackageDescriptor::new("htop", "candidate").unwrap();

    let report = PackageRunner::new(descriptor, OperationKind::Install, spawner)
        .run()
        .await;

    assert_eq!(report.descriptor.package_name, "htop");
    assert_eq!(report.descriptor.channel, "candidate");
    assert_eq!(report.kind, OperationKind::Install);
}
