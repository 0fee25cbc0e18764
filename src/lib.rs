//! # deepsearch
//!
//! A conversational research agent: a bounded tool-calling loop over a
//! streaming completion model, with live web search and bulk page scraping
//! as tools, a global windowed rate limiter in front of the model, and
//! owner-scoped conversation persistence with a daily request quota.
//!
//! The completion engine itself is a collaborator behind the
//! [`provider::CompletionModel`] trait; this crate supplies everything
//! around it.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use deepsearch::agent::LoopRunner;
//! use deepsearch::config::DeepSearchConfig;
//! use deepsearch::service::{ChatRequest, ChatService};
//! use deepsearch::store::MemoryStore;
//! use deepsearch::types::ModelMessage;
//!
//! # async fn example(model: Arc<dyn deepsearch::provider::CompletionModel>) -> Result<(), deepsearch::error::DeepSearchError> {
//! let service = ChatService::new(
//!     Arc::new(LoopRunner::new(model)),
//!     Arc::new(MemoryStore::new()),
//!     DeepSearchConfig::from_env(),
//! )?;
//! let run = service
//!     .run_chat(ChatRequest {
//!         owner_id: "user-1".to_string(),
//!         is_admin: false,
//!         conversation_id: None,
//!         messages: vec![ModelMessage::user("What changed in Rust this month?")],
//!     })
//!     .await?;
//! let result = run.handle.wait().await?;
//! println!("{}", result.final_text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod crawler;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod search;
pub mod service;
pub mod store;
pub mod throttle;
pub mod tools;
pub mod types;

pub use agent::{ask, LoopRunner, RunHandle, RunRequest, RunResult, RunStatus, Runner};
pub use config::DeepSearchConfig;
pub use error::{DeepSearchError, Result};
pub use service::{ChatRequest, ChatRun, ChatService};
pub use store::{ConversationStore, MemoryStore};
