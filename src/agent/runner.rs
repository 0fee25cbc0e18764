//! The bounded tool-calling loop.
//!
//! A run drives the completion model through up to `max_steps` rounds. Each
//! round streams one completion; if the model requested tools, they are
//! executed and their results appended to the transcript before the next
//! round. A round with no tool calls is the final answer. When the budget
//! runs out while the model is still asking for tools, the run terminates
//! with whatever partial text exists instead of erroring.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::DeepSearchError;
use crate::provider::{CompletionModel, CompletionRequest, ToolDefinition};
use crate::throttle::{RateLimitConfig, RateLimiter};
use crate::tools::validation::validate_arguments;
use crate::tools::{Tool, ToolArguments};
use crate::types::{
    AgentToolCall, AgentToolResult, ContentPart, ModelMessage, Role, StreamEventType,
};

use super::events::{RunEventEmitter, RunEventPayload, RunEventSink, RunLifecycle};
use super::types::{RunId, RunResult, RunStatus};

/// Default round budget per run.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Callback invoked exactly once when a run reaches a terminal answer.
///
/// Not invoked for canceled or failed runs.
pub type FinishHandler = Arc<dyn Fn(RunResult) -> BoxFuture<'static, ()> + Send + Sync>;

/// A request to run the agent loop.
#[derive(Clone)]
pub struct RunRequest {
    pub run_id: RunId,
    pub messages: Vec<ModelMessage>,
    pub system: Option<String>,
    pub tools: Vec<Arc<dyn Tool>>,
    pub max_steps: usize,
    /// Admission gate applied before every completion invocation. `None`
    /// disables gating.
    pub rate_limit: Option<RateLimitConfig>,
    pub event_sink: Option<RunEventSink>,
    pub on_finish: Option<FinishHandler>,
}

impl RunRequest {
    pub fn new(messages: Vec<ModelMessage>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            messages,
            system: None,
            tools: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
            rate_limit: None,
            event_sink: None,
            on_finish: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    pub fn with_event_sink(mut self, sink: RunEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn with_on_finish(mut self, handler: FinishHandler) -> Self {
        self.on_finish = Some(handler);
        self
    }
}

/// Handle to a running agent loop.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    abort_tx: Option<oneshot::Sender<()>>,
    result_rx: oneshot::Receiver<RunResult>,
}

impl RunHandle {
    fn new(run_id: RunId) -> (Self, oneshot::Receiver<()>, oneshot::Sender<RunResult>) {
        let (abort_tx, abort_rx) = oneshot::channel();
        let (result_tx, result_rx) = oneshot::channel();
        (
            Self {
                run_id,
                abort_tx: Some(abort_tx),
                result_rx,
            },
            abort_rx,
            result_tx,
        )
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Request cooperative cancellation. Idempotent.
    pub fn abort(&mut self) {
        if let Some(tx) = self.abort_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the run to finish and return its result.
    pub async fn wait(self) -> Result<RunResult, DeepSearchError> {
        self.result_rx.await.map_err(|_| {
            DeepSearchError::InvalidState("run task dropped without reporting a result".to_string())
        })
    }
}

/// Core trait for agent loop runners.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn start(&self, request: RunRequest) -> Result<RunHandle, DeepSearchError>;
}

/// The default runner: spawns the loop as a tokio task.
pub struct LoopRunner {
    model: Arc<dyn CompletionModel>,
}

impl LoopRunner {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Runner for LoopRunner {
    async fn start(&self, request: RunRequest) -> Result<RunHandle, DeepSearchError> {
        if request.max_steps == 0 {
            return Err(DeepSearchError::InvalidState(
                "max_steps must be at least 1".to_string(),
            ));
        }
        let (handle, abort_rx, result_tx) = RunHandle::new(request.run_id);
        let model = Arc::clone(&self.model);
        tokio::spawn(run_loop(model, request, abort_rx, result_tx));
        Ok(handle)
    }
}

async fn run_loop(
    model: Arc<dyn CompletionModel>,
    request: RunRequest,
    mut abort_rx: oneshot::Receiver<()>,
    result_tx: oneshot::Sender<RunResult>,
) {
    let emitter = RunEventEmitter::new(request.run_id, request.event_sink.clone());
    emitter.emit(RunEventPayload::Lifecycle {
        state: RunLifecycle::Started,
    });
    tracing::debug!(run_id = %request.run_id, model = model.name(), "run started");

    let cancel = CancellationToken::new();
    let tool_definitions: Vec<ToolDefinition> = request
        .tools
        .iter()
        .map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters(),
        })
        .collect();

    let mut messages = request.messages.clone();
    // Last non-empty assistant text, surfaced as the partial answer when the
    // round budget runs out.
    let mut partial_text = String::new();
    let mut answer: Option<String> = None;

    for round in 1..=request.max_steps {
        if let Some(config) = &request.rate_limit {
            let admitted = tokio::select! {
                _ = &mut abort_rx => {
                    finish(&emitter, result_tx, None, RunResult::canceled(messages)).await;
                    return;
                }
                admitted = RateLimiter::global().acquire_with_retry(config) => admitted,
            };
            if !admitted {
                let error = DeepSearchError::RateLimited {
                    retries: config.max_retries,
                };
                tracing::warn!(run_id = %request.run_id, round, "rate limit retries exhausted");
                finish(
                    &emitter,
                    result_tx,
                    None,
                    RunResult::failed(&error, messages),
                )
                .await;
                return;
            }
        }

        let completion_request = CompletionRequest {
            messages: messages.clone(),
            system: request.system.clone(),
            tools: tool_definitions.clone(),
        };
        let mut stream = tokio::select! {
            _ = &mut abort_rx => {
                finish(&emitter, result_tx, None, RunResult::canceled(messages)).await;
                return;
            }
            started = model.stream(&completion_request) => match started {
                Ok(stream) => stream,
                Err(error) => {
                    finish(
                        &emitter,
                        result_tx,
                        None,
                        RunResult::failed(&error, messages),
                    )
                    .await;
                    return;
                }
            }
        };

        let mut round_text = String::new();
        let mut calls: Vec<AgentToolCall> = Vec::new();
        loop {
            let delta = tokio::select! {
                _ = &mut abort_rx => {
                    finish(&emitter, result_tx, None, RunResult::canceled(messages)).await;
                    return;
                }
                delta = stream.next() => delta,
            };
            match delta {
                Some(Ok(delta)) => match delta.event_type {
                    StreamEventType::TextDelta => {
                        if !delta.text.is_empty() {
                            emitter.emit(RunEventPayload::AssistantDelta {
                                text: delta.text.clone(),
                            });
                            round_text.push_str(&delta.text);
                        }
                    }
                    StreamEventType::ToolCallDelta => {
                        if let Some(call) = delta.tool_call {
                            calls.push(call);
                        }
                    }
                    StreamEventType::Done => break,
                    StreamEventType::Error => {
                        let error = DeepSearchError::Stream(delta.text);
                        finish(
                            &emitter,
                            result_tx,
                            None,
                            RunResult::failed(&error, messages),
                        )
                        .await;
                        return;
                    }
                },
                Some(Err(error)) => {
                    finish(
                        &emitter,
                        result_tx,
                        None,
                        RunResult::failed(&error, messages),
                    )
                    .await;
                    return;
                }
                None => break,
            }
        }

        let mut content: Vec<ContentPart> = Vec::new();
        if !round_text.is_empty() {
            content.push(ContentPart::Text {
                text: round_text.clone(),
            });
        }
        for call in &calls {
            content.push(ContentPart::ToolCall(call.clone()));
        }
        if !content.is_empty() {
            messages.push(ModelMessage {
                role: Role::Assistant,
                content,
                timestamp: Some(chrono::Utc::now()),
            });
        }
        if !round_text.is_empty() {
            partial_text = round_text.clone();
        }

        if calls.is_empty() {
            answer = Some(round_text);
            break;
        }

        tracing::debug!(
            run_id = %request.run_id,
            round,
            tool_calls = calls.len(),
            "dispatching tool calls"
        );
        for call in calls {
            emitter.emit(RunEventPayload::ToolCallStarted { call: call.clone() });
            let result = tokio::select! {
                _ = &mut abort_rx => {
                    cancel.cancel();
                    finish(&emitter, result_tx, None, RunResult::canceled(messages)).await;
                    return;
                }
                result = execute_tool(&request.tools, &call, cancel.child_token()) => result,
            };
            emitter.emit(RunEventPayload::ToolResult {
                result: result.clone(),
            });
            emitter.emit(RunEventPayload::ToolCallCompleted { call });
            messages.push(ModelMessage::tool_result(
                result.tool_call_id,
                result.result,
                result.is_error,
            ));
        }
    }

    let result = match answer {
        Some(text) => RunResult::completed(messages, text),
        None => {
            tracing::debug!(run_id = %request.run_id, "round budget exhausted");
            RunResult::budget_exhausted(messages, partial_text)
        }
    };
    finish(&emitter, result_tx, request.on_finish, result).await;
}

/// Resolve and execute one tool call. Tool failures never abort the run;
/// they are fed back to the model as error results.
async fn execute_tool(
    tools: &[Arc<dyn Tool>],
    call: &AgentToolCall,
    cancel: CancellationToken,
) -> AgentToolResult {
    let Some(tool) = tools.iter().find(|tool| tool.name() == call.name) else {
        return AgentToolResult {
            tool_call_id: call.id.clone(),
            result: serde_json::json!({"error": format!("unknown tool: {}", call.name)}),
            is_error: true,
        };
    };

    if let Err(message) = validate_arguments(&call.arguments, &tool.parameters()) {
        tracing::debug!(tool = call.name, %message, "rejected tool arguments");
        return AgentToolResult {
            tool_call_id: call.id.clone(),
            result: serde_json::json!({"error": format!("invalid arguments: {message}")}),
            is_error: true,
        };
    }

    let arguments = ToolArguments::new(call.arguments.clone());
    match tool.execute(&arguments, cancel).await {
        Ok(value) => AgentToolResult {
            tool_call_id: call.id.clone(),
            result: value,
            is_error: false,
        },
        Err(error) => AgentToolResult {
            tool_call_id: call.id.clone(),
            result: serde_json::json!({"error": error.to_string()}),
            is_error: true,
        },
    }
}

async fn finish(
    emitter: &RunEventEmitter,
    result_tx: oneshot::Sender<RunResult>,
    on_finish: Option<FinishHandler>,
    result: RunResult,
) {
    if result.is_done() {
        if let Some(handler) = on_finish {
            handler(result.clone()).await;
        }
    }
    let state = match &result.status {
        RunStatus::Completed => RunLifecycle::Completed,
        RunStatus::BudgetExhausted => RunLifecycle::BudgetExhausted,
        RunStatus::Failed => RunLifecycle::Failed {
            error: result
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_default(),
        },
        RunStatus::Canceled => RunLifecycle::Canceled,
    };
    emitter.emit(RunEventPayload::Lifecycle { state });
    let _ = result_tx.send(result);
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use futures::stream::BoxStream;

    use crate::error::ErrorCategory;
    use crate::types::StreamDelta;

    use super::super::events::RunEvent;
    use super::*;

    struct StubModel {
        rounds: Mutex<VecDeque<Vec<StreamDelta>>>,
        fallback: Option<Vec<StreamDelta>>,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn scripted(rounds: Vec<Vec<StreamDelta>>) -> Self {
            Self {
                rounds: Mutex::new(rounds.into()),
                fallback: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn repeating(deltas: Vec<StreamDelta>) -> Self {
            Self {
                rounds: Mutex::new(VecDeque::new()),
                fallback: Some(deltas),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for StubModel {
        fn name(&self) -> &str {
            "stub"
        }

        async fn stream(
            &self,
            _request: &CompletionRequest,
        ) -> Result<BoxStream<'static, Result<StreamDelta, DeepSearchError>>, DeepSearchError>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let deltas = self
                .rounds
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| self.fallback.clone())
                .ok_or_else(|| DeepSearchError::provider(500, "script exhausted"))?;
            Ok(Box::pin(futures::stream::iter(
                deltas.into_iter().map(Ok),
            )))
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the query back"
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            })
        }

        async fn execute(
            &self,
            args: &ToolArguments,
            _cancel: CancellationToken,
        ) -> Result<serde_json::Value, DeepSearchError> {
            Ok(serde_json::json!({"echoed": args.get_str("query")?}))
        }
    }

    struct HangingTool;

    #[async_trait]
    impl Tool for HangingTool {
        fn name(&self) -> &str {
            "hang"
        }

        fn description(&self) -> &str {
            "Never finishes"
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }

        async fn execute(
            &self,
            _args: &ToolArguments,
            _cancel: CancellationToken,
        ) -> Result<serde_json::Value, DeepSearchError> {
            futures::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn call(id: &str, name: &str, arguments: serde_json::Value) -> StreamDelta {
        StreamDelta::tool_call_delta(AgentToolCall {
            id: id.into(),
            name: name.to_string(),
            arguments,
        })
    }

    fn capture_events() -> (RunEventSink, Arc<Mutex<Vec<RunEvent>>>) {
        let events: Arc<Mutex<Vec<RunEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&events);
        let sink: RunEventSink = Arc::new(move |event| {
            captured.lock().unwrap().push(event);
        });
        (sink, events)
    }

    fn count_finishes() -> (FinishHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&count);
        let handler: FinishHandler = Arc::new(move |_result| {
            let counted = Arc::clone(&counted);
            Box::pin(async move {
                counted.fetch_add(1, Ordering::SeqCst);
            })
        });
        (handler, count)
    }

    #[tokio::test]
    async fn text_only_run_completes() {
        let model = Arc::new(StubModel::scripted(vec![vec![
            StreamDelta::text_delta("Hello"),
            StreamDelta::text_delta(" world"),
            StreamDelta::done(),
        ]]));
        let (sink, events) = capture_events();
        let (on_finish, finishes) = count_finishes();
        let runner = LoopRunner::new(model.clone());

        let handle = runner
            .start(
                RunRequest::new(vec![ModelMessage::user("hi")])
                    .with_event_sink(sink)
                    .with_on_finish(on_finish),
            )
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.final_text, "Hello world");
        assert_eq!(model.call_count(), 1);
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
        let last = result.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text(), "Hello world");

        let events = events.lock().unwrap();
        let deltas = events
            .iter()
            .filter(|e| matches!(e.payload, RunEventPayload::AssistantDelta { .. }))
            .count();
        assert_eq!(deltas, 2);
        assert!(matches!(
            events.last().unwrap().payload,
            RunEventPayload::Lifecycle {
                state: RunLifecycle::Completed
            }
        ));
        // seq is strictly increasing
        for pair in events.windows(2) {
            assert!(pair[0].seq < pair[1].seq);
        }
    }

    #[tokio::test]
    async fn tool_round_then_answer() {
        let model = Arc::new(StubModel::scripted(vec![
            vec![
                call("c1", "echo", serde_json::json!({"query": "rust"})),
                StreamDelta::done(),
            ],
            vec![StreamDelta::text_delta("answer"), StreamDelta::done()],
        ]));
        let runner = LoopRunner::new(model.clone());

        let handle = runner
            .start(RunRequest::new(vec![ModelMessage::user("hi")]).with_tool(Arc::new(EchoTool)))
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.final_text, "answer");
        assert_eq!(model.call_count(), 2);

        // user, assistant(tool call), tool result, assistant(answer)
        assert_eq!(result.messages.len(), 4);
        assert_eq!(result.messages[1].role, Role::Assistant);
        assert_eq!(result.messages[1].tool_calls().len(), 1);
        assert_eq!(result.messages[2].role, Role::Tool);
        match &result.messages[2].content[0] {
            ContentPart::ToolResult(tool_result) => {
                assert!(!tool_result.is_error);
                assert_eq!(tool_result.tool_call_id, "c1");
                assert_eq!(tool_result.result["echoed"], "rust");
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn budget_exhaustion_stops_after_exact_round_count() {
        let model = Arc::new(StubModel::repeating(vec![
            StreamDelta::text_delta("thinking"),
            call("c", "echo", serde_json::json!({"query": "again"})),
            StreamDelta::done(),
        ]));
        let (on_finish, finishes) = count_finishes();
        let runner = LoopRunner::new(model.clone());

        let handle = runner
            .start(
                RunRequest::new(vec![ModelMessage::user("hi")])
                    .with_tool(Arc::new(EchoTool))
                    .with_max_steps(10)
                    .with_on_finish(on_finish),
            )
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::BudgetExhausted);
        assert_eq!(model.call_count(), 10);
        assert_eq!(result.final_text, "thinking");
        assert_eq!(finishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_arguments_become_error_tool_result() {
        let model = Arc::new(StubModel::scripted(vec![
            vec![
                call("c1", "echo", serde_json::json!({"wrong": 1})),
                StreamDelta::done(),
            ],
            vec![StreamDelta::text_delta("recovered"), StreamDelta::done()],
        ]));
        let runner = LoopRunner::new(model);

        let handle = runner
            .start(RunRequest::new(vec![ModelMessage::user("hi")]).with_tool(Arc::new(EchoTool)))
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.final_text, "recovered");
        match &result.messages[2].content[0] {
            ContentPart::ToolResult(tool_result) => {
                assert!(tool_result.is_error);
                assert!(tool_result.result["error"]
                    .as_str()
                    .unwrap()
                    .contains("invalid arguments"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_reported_to_model() {
        let model = Arc::new(StubModel::scripted(vec![
            vec![
                call("c1", "missing", serde_json::json!({})),
                StreamDelta::done(),
            ],
            vec![StreamDelta::text_delta("ok"), StreamDelta::done()],
        ]));
        let runner = LoopRunner::new(model);

        let handle = runner
            .start(RunRequest::new(vec![ModelMessage::user("hi")]))
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        match &result.messages[2].content[0] {
            ContentPart::ToolResult(tool_result) => {
                assert!(tool_result.is_error);
                assert!(tool_result.result["error"]
                    .as_str()
                    .unwrap()
                    .contains("unknown tool"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn abort_cancels_without_finalize() {
        let model = Arc::new(StubModel::scripted(vec![vec![
            call("c1", "hang", serde_json::json!({})),
            StreamDelta::done(),
        ]]));
        let (on_finish, finishes) = count_finishes();
        let runner = LoopRunner::new(model);

        let mut handle = runner
            .start(
                RunRequest::new(vec![ModelMessage::user("hi")])
                    .with_tool(Arc::new(HangingTool))
                    .with_on_finish(on_finish),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Canceled);
        assert_eq!(finishes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rate_limit_exhaustion_fails_run_with_retryable_error() {
        let model = Arc::new(StubModel::scripted(vec![vec![
            StreamDelta::text_delta("never seen"),
            StreamDelta::done(),
        ]]));
        let runner = LoopRunner::new(model.clone());
        let config = RateLimitConfig {
            key_prefix: "test:runner:exhausted".to_string(),
            max_requests_in_window: 0,
            window_duration_ms: 60_000,
            max_retries: 0,
        };

        let handle = runner
            .start(
                RunRequest::new(vec![ModelMessage::user("hi")]).with_rate_limit(config),
            )
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Failed);
        assert_eq!(model.call_count(), 0);
        // Callers must be able to distinguish this from a hard provider
        // fault without parsing the message.
        let error = result.error.expect("failed run carries an error");
        assert_eq!(error.category, ErrorCategory::RateLimit);
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn stream_error_fails_run() {
        let model = Arc::new(StubModel::scripted(vec![vec![StreamDelta {
            text: "engine went away".to_string(),
            event_type: StreamEventType::Error,
            tool_call: None,
        }]]));
        let runner = LoopRunner::new(model);

        let handle = runner
            .start(RunRequest::new(vec![ModelMessage::user("hi")]))
            .await
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert_eq!(result.status, RunStatus::Failed);
        let error = result.error.expect("failed run carries an error");
        assert!(error.message.contains("engine went away"));
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn zero_max_steps_is_rejected() {
        let model = Arc::new(StubModel::scripted(vec![]));
        let runner = LoopRunner::new(model);
        let err = runner
            .start(RunRequest::new(vec![ModelMessage::user("hi")]).with_max_steps(0))
            .await
            .expect_err("expected invalid state");
        assert!(matches!(err, DeepSearchError::InvalidState(_)));
    }
}
