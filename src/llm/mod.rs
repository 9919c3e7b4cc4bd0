//! Language-model provider boundary.
//!
//! This module provides:
//! * [`ChatClient`] — async trait implemented by all chat-completion backends.
//! * [`ApiChatClient`] — OpenAI-compatible REST API client (DeepSeek by default).
//! * [`ChatRequest`] — one completion request (system + user message,
//!   temperature, optional token bound, optional JSON mode).
//! * [`LlmError`] — error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use clinical_supervisor::config::AppConfig;
//! use clinical_supervisor::llm::{ApiChatClient, ChatClient, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiChatClient::from_config(&config.llm);
//!
//!     let request = ChatRequest::new("Eres un asistente.", "Hola.").temperature(0.5);
//!     match client.complete(&request).await {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("completion failed: {e}"),
//!     }
//! }
//! ```

pub mod client;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiChatClient, ChatClient, ChatRequest, LlmError};
