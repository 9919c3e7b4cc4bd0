//! Core `Transcriber` trait and `ReplicateTranscriber` implementation.
//!
//! `ReplicateTranscriber` sends audio to a Replicate-hosted Whisper model
//! using the synchronous prediction API (`Prefer: wait`), so one HTTP
//! round-trip yields the finished prediction.  All connection details come
//! from [`TranscriptionConfig`]; nothing is hardcoded.

use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::config::TranscriptionConfig;
use crate::transcribe::output::classify;

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Errors that can occur while transcribing an audio file.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The audio file could not be read from disk.
    #[error("failed to read audio file {path}: {source}")]
    Audio {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// HTTP transport or connection error.
    #[error("transcription request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),

    /// The provider reported the prediction itself failed.
    #[error("transcription prediction failed: {0}")]
    Prediction(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscribeError::Timeout
        } else {
            TranscribeError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async trait for speech-to-text backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Transcriber>`).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio` and return the transcript text.
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscribeError>;
}

// ---------------------------------------------------------------------------
// ReplicateTranscriber
// ---------------------------------------------------------------------------

/// Calls a Replicate-hosted Whisper model over the predictions API.
///
/// The audio file is read from disk, base64-encoded into a `data:` URI and
/// submitted as the model's `audio` input.  The request carries a
/// `Prefer: wait` header so the response already contains the prediction's
/// `output` field, which is then normalised by
/// [`ProviderOutput`](crate::transcribe::ProviderOutput) into a transcript
/// string.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`, `version`) come
/// exclusively from the [`TranscriptionConfig`] passed to
/// [`ReplicateTranscriber::from_config`].
pub struct ReplicateTranscriber {
    client: reqwest::Client,
    config: TranscriptionConfig,
}

impl ReplicateTranscriber {
    /// Build a `ReplicateTranscriber` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Prediction endpoint for the configured model.
    ///
    /// With a pinned `version` the generic predictions endpoint is used and
    /// the version travels in the body; otherwise the model-scoped endpoint
    /// resolves the latest version server-side.
    fn endpoint(&self) -> String {
        match self.config.version {
            Some(_) => format!("{}/v1/predictions", self.config.base_url),
            None => format!(
                "{}/v1/models/{}/predictions",
                self.config.base_url, self.config.model
            ),
        }
    }

    /// Build the prediction request body for one audio data URI.
    fn request_body(&self, audio_uri: String) -> serde_json::Value {
        let mut body = serde_json::json!({
            "input": {
                "audio":      audio_uri,
                "task":       "transcribe",
                "language":   self.config.language,
                "batch_size": self.config.batch_size,
                "timestamp":  "chunk",
            }
        });

        if let Some(version) = &self.config.version {
            body["version"] = serde_json::json!(version);
        }

        body
    }
}

#[async_trait]
impl Transcriber for ReplicateTranscriber {
    /// Read, encode and submit `audio`; return the normalised transcript.
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscribeError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|source| TranscribeError::Audio {
                path: audio.display().to_string(),
                source,
            })?;

        log::debug!(
            "submitting {} bytes of audio to {}",
            bytes.len(),
            self.config.model
        );

        let audio_uri = format!(
            "data:application/octet-stream;base64,{}",
            general_purpose::STANDARD.encode(&bytes)
        );

        let mut req = self
            .client
            .post(self.endpoint())
            .header("Prefer", "wait")
            .json(&self.request_body(audio_uri));

        if let Some(key) = self.config.resolve_api_key() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        if json["status"].as_str() == Some("failed") {
            let detail = json["error"].as_str().unwrap_or("unknown error");
            return Err(TranscribeError::Prediction(detail.to_string()));
        }

        let output = json
            .get("output")
            .cloned()
            .ok_or_else(|| TranscribeError::Parse("response has no `output` field".into()))?;

        let transcript = classify(output)
            .into_transcript(self.config.label_speakers)
            .trim()
            .to_string();

        log::debug!("received transcript ({} chars)", transcript.len());

        Ok(transcript)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
