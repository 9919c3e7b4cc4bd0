//! Sentinel transcriber — wraps any [`Transcriber`] and returns `""` on error.
//!
//! When the underlying provider call fails for any reason (`Audio`,
//! `Request`, `Timeout`, `Parse`, `Prediction`) [`SentinelTranscriber`]
//! returns the empty string instead of propagating the error.  Downstream
//! code treats an empty transcript as "nothing to analyse", so a provider
//! outage degrades one session instead of crashing the pipeline.

use std::path::Path;

use async_trait::async_trait;

use crate::transcribe::provider::{TranscribeError, Transcriber};

// ---------------------------------------------------------------------------
// SentinelTranscriber
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`Transcriber`] that never returns an
/// error — on failure it returns the empty string.
///
/// # Example
/// ```rust
/// use clinical_supervisor::config::TranscriptionConfig;
/// use clinical_supervisor::transcribe::{ReplicateTranscriber, SentinelTranscriber};
///
/// let inner = ReplicateTranscriber::from_config(&TranscriptionConfig::default());
/// let transcriber = SentinelTranscriber::new(inner);
/// // `transcriber` now implements Transcriber and is safe to use even when
/// // the provider is unreachable.
/// ```
pub struct SentinelTranscriber<T: Transcriber> {
    inner: T,
}

impl<T: Transcriber> SentinelTranscriber<T> {
    /// Wrap `inner` with sentinel behaviour.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped transcriber.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transcriber + Send + Sync> Transcriber for SentinelTranscriber<T> {
    /// Attempt transcription; return `""` if any error occurs.
    ///
    /// This implementation **never** returns `Err(_)`.
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscribeError> {
        match self.inner.transcribe(audio).await {
            Ok(transcript) => Ok(transcript),
            Err(err) => {
                log::warn!("transcription failed ({err}) — returning empty transcript");
                Ok(String::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always succeeds with a fixed transcript.
    struct AlwaysOk(String);

    #[async_trait]
    impl Transcriber for AlwaysOk {
        async fn transcribe(&self, _audio: &Path) -> Result<String, TranscribeError> {
            Ok(self.0.clone())
        }
    }

    /// Always returns the given error.
    struct AlwaysFails(ErrorKind);

    enum ErrorKind {
        Audio,
        Request,
        Timeout,
        Parse,
        Prediction,
    }

    #[async_trait]
    impl Transcriber for AlwaysFails {
        async fn transcribe(&self, _audio: &Path) -> Result<String, TranscribeError> {
            let err = match self.0 {
                ErrorKind::Audio => TranscribeError::Audio {
                    path: "/tmp/audio.ogg".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                },
                ErrorKind::Request => TranscribeError::Request("connection refused".into()),
                ErrorKind::Timeout => TranscribeError::Timeout,
                ErrorKind::Parse => TranscribeError::Parse("bad json".into()),
                ErrorKind::Prediction => TranscribeError::Prediction("model crashed".into()),
            };
            Err(err)
        }
    }

    fn audio_path() -> &'static Path {
        Path::new("/tmp/sesion.ogg")
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn passes_through_success() {
        let transcriber = SentinelTranscriber::new(AlwaysOk("hola doctora".into()));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "hola doctora");
    }

    #[tokio::test]
    async fn returns_empty_on_audio_error() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Audio));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn returns_empty_on_request_error() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Request));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn returns_empty_on_timeout() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Timeout));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn returns_empty_on_parse_error() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Parse));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn returns_empty_on_prediction_failure() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Prediction));
        let result = transcriber.transcribe(audio_path()).await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn never_returns_err() {
        let transcriber = SentinelTranscriber::new(AlwaysFails(ErrorKind::Timeout));
        // Must always be Ok(_), even on failure
        assert!(transcriber.transcribe(audio_path()).await.is_ok());
    }

    /// SentinelTranscriber<T> must itself be a valid Transcriber (object-safe).
    #[test]
    fn sentinel_is_object_safe() {
        let inner = AlwaysOk("ok".into());
        let _: Box<dyn Transcriber> = Box::new(SentinelTranscriber::new(inner));
    }
}
