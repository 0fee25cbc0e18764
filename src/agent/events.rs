//! Run event stream types.
//!
//! Events are emitted incrementally as the loop produces them; the transport
//! layer forwards them to the caller without buffering until completion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AgentToolCall, AgentToolResult};

use super::types::RunId;

/// Callback used for streaming run events.
pub type RunEventSink = Arc<dyn Fn(RunEvent) + Send + Sync>;

/// Run lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RunLifecycle {
    Started,
    Completed,
    /// The step budget ran out while the model was still requesting tools;
    /// whatever partial text exists was surfaced.
    BudgetExhausted,
    Failed { error: String },
    Canceled,
}

/// Concrete event payloads emitted by the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEventPayload {
    Lifecycle {
        state: RunLifecycle,
    },
    /// Emitted before any model output when the service created a new
    /// conversation for this run.
    ChatCreated {
        chat_id: String,
    },
    AssistantDelta {
        text: String,
    },
    ToolCallStarted {
        call: AgentToolCall,
    },
    ToolResult {
        result: AgentToolResult,
    },
    ToolCallCompleted {
        call: AgentToolCall,
    },
}

/// Envelope for streaming run events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub run_id: RunId,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: RunEventPayload,
}

/// Ordered, sequence-numbered event emitter over an optional sink.
pub(crate) struct RunEventEmitter {
    run_id: RunId,
    seq: std::sync::atomic::AtomicU64,
    sink: Option<RunEventSink>,
}

impl RunEventEmitter {
    pub(crate) fn new(run_id: RunId, sink: Option<RunEventSink>) -> Self {
        Self {
            run_id,
            seq: std::sync::atomic::AtomicU64::new(1),
            sink,
        }
    }

    pub(crate) fn emit(&self, payload: RunEventPayload) {
        let Some(sink) = &self.sink else {
            return;
        };
        let seq = self.seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        (sink)(RunEvent {
            run_id: self.run_id,
            seq,
            timestamp: Utc::now(),
            payload,
        });
    }
}
