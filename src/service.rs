//! Chat orchestration: quota, persistence, and the agent loop wired together.
//!
//! This is the layer a transport (HTTP handler, CLI) talks to. It owns the
//! per-owner daily quota, resolves conversations, streams run events to the
//! caller, and persists the collapsed transcript exactly once when a run
//! reaches a terminal answer.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::agent::{
    FinishHandler, RunEvent, RunEventPayload, RunEventSink, RunHandle, RunRequest, Runner,
};
use crate::config::DeepSearchConfig;
use crate::crawler::Crawler;
use crate::error::DeepSearchError;
use crate::prompt::research_system_prompt;
use crate::search::SearchClient;
use crate::store::{ConversationStore, DailyQuota, UpsertConversation};
use crate::tools::{ScrapePagesTool, SearchWebTool, Tool};
use crate::types::{collapse_transcript, ModelMessage, Role};

/// Title length cap for derived conversation titles.
const TITLE_MAX_CHARS: usize = 50;

/// A chat turn request from a transport.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub owner_id: String,
    pub is_admin: bool,
    /// `None` starts a new conversation.
    pub conversation_id: Option<String>,
    /// Full history including the newest user message.
    pub messages: Vec<ModelMessage>,
}

/// A started chat run: the event stream plus the handle to await or abort it.
#[derive(Debug)]
pub struct ChatRun {
    pub conversation_id: String,
    pub events: UnboundedReceiverStream<RunEvent>,
    pub handle: RunHandle,
}

pub struct ChatService {
    runner: Arc<dyn Runner>,
    store: Arc<dyn ConversationStore>,
    quota: Arc<DailyQuota>,
    tools: Vec<Arc<dyn Tool>>,
    config: DeepSearchConfig,
}

impl ChatService {
    /// Build a service with the standard research tool set.
    pub fn new(
        runner: Arc<dyn Runner>,
        store: Arc<dyn ConversationStore>,
        config: DeepSearchConfig,
    ) -> Result<Self, DeepSearchError> {
        let http = reqwest::Client::new();
        let search = SearchClient::from_config(http.clone(), &config)?;
        let crawler = Crawler::new(http, config.crawl.clone());
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(SearchWebTool::new(search, config.search_result_count)),
            Arc::new(ScrapePagesTool::new(crawler)),
        ];
        Ok(Self {
            runner,
            store,
            quota: Arc::new(DailyQuota::default()),
            tools,
            config,
        })
    }

    pub fn with_quota(mut self, quota: DailyQuota) -> Self {
        self.quota = Arc::new(quota);
        self
    }

    /// Start one chat turn.
    ///
    /// Gates on the daily quota, resolves (or creates) the conversation,
    /// then starts the agent loop. New conversations are persisted before
    /// the model produces anything so the user's message survives a crash
    /// mid-stream.
    pub async fn run_chat(&self, request: ChatRequest) -> Result<ChatRun, DeepSearchError> {
        self.quota
            .check_and_record(&request.owner_id, request.is_admin)?;

        let (conversation_id, title, is_new) = match &request.conversation_id {
            Some(id) => {
                let existing = self
                    .store
                    .fetch_conversation(&request.owner_id, id)
                    .await?;
                (existing.id, existing.title, false)
            }
            None => (
                Uuid::new_v4().to_string(),
                derive_title(&request.messages),
                true,
            ),
        };

        if is_new {
            self.store
                .upsert_conversation(UpsertConversation {
                    owner_id: request.owner_id.clone(),
                    conversation_id: conversation_id.clone(),
                    title: title.clone(),
                    messages: collapse_transcript(&request.messages),
                })
                .await?;
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let sink: RunEventSink = {
            let event_tx = event_tx.clone();
            Arc::new(move |event| {
                let _ = event_tx.send(event);
            })
        };

        let on_finish: FinishHandler = {
            let store = Arc::clone(&self.store);
            let owner_id = request.owner_id.clone();
            let conversation_id = conversation_id.clone();
            let title = title.clone();
            Arc::new(move |result| {
                let store = Arc::clone(&store);
                let owner_id = owner_id.clone();
                let conversation_id = conversation_id.clone();
                let title = title.clone();
                Box::pin(async move {
                    let upsert = UpsertConversation {
                        owner_id,
                        conversation_id: conversation_id.clone(),
                        title,
                        messages: collapse_transcript(&result.messages),
                    };
                    if let Err(error) = store.upsert_conversation(upsert).await {
                        // The answer was already streamed; never retract it.
                        tracing::error!(
                            conversation_id,
                            %error,
                            "failed to persist finished conversation"
                        );
                    }
                })
            })
        };

        let mut run_request = RunRequest::new(request.messages)
            .with_system(research_system_prompt())
            .with_max_steps(self.config.max_steps)
            .with_rate_limit(self.config.rate_limit.clone())
            .with_event_sink(sink)
            .with_on_finish(on_finish);
        run_request.tools = self.tools.clone();

        if is_new {
            let _ = event_tx.send(RunEvent {
                run_id: run_request.run_id,
                seq: 0,
                timestamp: Utc::now(),
                payload: RunEventPayload::ChatCreated {
                    chat_id: conversation_id.clone(),
                },
            });
        }

        let handle = self.runner.start(run_request).await?;
        tracing::debug!(
            owner_id = request.owner_id,
            conversation_id,
            is_new,
            "chat run started"
        );
        Ok(ChatRun {
            conversation_id,
            events: UnboundedReceiverStream::new(event_rx),
            handle,
        })
    }
}

/// Derive a conversation title from the newest user message: its text capped
/// at fifty characters, or a fixed fallback when there is none.
fn derive_title(messages: &[ModelMessage]) -> String {
    let text = messages
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(ModelMessage::text)
        .unwrap_or_default();
    if text.is_empty() {
        return "New Chat".to_string();
    }
    text.chars().take(TITLE_MAX_CHARS).collect()
}
