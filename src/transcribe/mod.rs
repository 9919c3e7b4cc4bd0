//! Speech-to-text provider boundary.
//!
//! This module provides:
//! * [`Transcriber`] — async trait implemented by all speech-to-text backends.
//! * [`ReplicateTranscriber`] — Replicate predictions API client (Whisper by
//!   default).
//! * [`SentinelTranscriber`] — wrapper that converts any transcription error
//!   into the empty-transcript sentinel `""`.
//! * [`ProviderOutput`] — the shapes a provider's `output` value can take,
//!   with one normalisation rule per shape.
//! * [`TranscribeError`] — error variants for transcription operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use clinical_supervisor::config::AppConfig;
//! use clinical_supervisor::transcribe::{
//!     ReplicateTranscriber, SentinelTranscriber, Transcriber,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let transcriber =
//!         SentinelTranscriber::new(ReplicateTranscriber::from_config(&config.transcription));
//!
//!     // Never errors: a provider failure yields "".
//!     let transcript = transcriber
//!         .transcribe(Path::new("sesion.ogg"))
//!         .await
//!         .unwrap_or_default();
//!     if transcript.is_empty() {
//!         eprintln!("no transcript");
//!     }
//! }
//! ```

pub mod output;
pub mod provider;
pub mod sentinel;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use output::{classify, ProviderOutput};
pub use provider::{ReplicateTranscriber, TranscribeError, Transcriber};
pub use sentinel::SentinelTranscriber;
