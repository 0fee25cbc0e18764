//! The agent loop: bounded tool-calling over a streaming completion model.

pub mod ask;
pub mod events;
pub mod runner;
pub mod types;

pub use ask::ask;
pub use events::{RunEvent, RunEventPayload, RunEventSink, RunLifecycle};
pub use runner::{FinishHandler, LoopRunner, RunHandle, RunRequest, Runner, DEFAULT_MAX_STEPS};
pub use types::{RunId, RunResult, RunStatus};
