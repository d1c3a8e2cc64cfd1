//! snaprun-exec: Process spawning abstraction
//!
//! Provides the `ProcessSpawner` trait, the event-stream types spawned
//! processes are observed through, and a tokio-based implementation

pub mod error;
pub mod local;
pub mod traits;

pub use error::ExecError;
pub use local::TokioSpawner;
pub use traits::{ProcessEvent, ProcessHandle, ProcessSpawner};
