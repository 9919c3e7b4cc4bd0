//! Three-stage report pipeline: extraction → synthesis → structuring.
//!
//! Each stage is one model call with its own fault policy:
//! * stage 1 degrades to an empty evidence bundle,
//! * stage 2 degrades to a fixed fallback narrative,
//! * stage 3 is terminal — its failure is the only one surfaced to the
//!   caller, because the structured report is the pipeline's contract.
//!
//! Stages run strictly in sequence, never retry, and share no state between
//! invocations.

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::llm::{ChatClient, LlmError};
use crate::recovery::parse_model_json;
use crate::report::model::{ClinicalReport, EvidenceBundle};
use crate::report::prompts;

/// Narrative substituted when stage 2 fails; stage 3 still runs on it.
const SYNTHESIS_FALLBACK: &str = "Error en el análisis.";

// ---------------------------------------------------------------------------
// StageError
// ---------------------------------------------------------------------------

/// A failure inside one pipeline stage.
///
/// The pipeline driver absorbs `Extraction` and `Synthesis` internally;
/// `Structuring` and `Unstructured` escape [`ReportPipeline::generate_report`]
/// so callers can apply their own recovery (a second parse attempt, then the
/// emergency mapping).
#[derive(Debug, Error)]
pub enum StageError {
    /// Stage 1 could not complete its model call.
    #[error("evidence extraction failed: {0}")]
    Extraction(LlmError),

    /// Stage 2 could not complete its model call.
    #[error("clinical synthesis failed: {0}")]
    Synthesis(LlmError),

    /// Stage 3 could not complete its model call.  Carries the stage-2
    /// narrative so the caller still has the analysis text.
    #[error("report structuring failed: {source}")]
    Structuring {
        /// The underlying model-call error.
        source: LlmError,
        /// The narrative stage 3 was asked to structure.
        narrative: String,
    },

    /// Stage 3 answered, but nothing parseable as a report came back.
    /// Carries the raw model text so the caller can preserve it.
    #[error("report structuring returned no parseable JSON")]
    Unstructured {
        /// The model's raw, unparseable answer.
        raw: String,
    },
}

// ---------------------------------------------------------------------------
// ReportPipeline
// ---------------------------------------------------------------------------

/// The three-stage report generator.
///
/// Holds one [`ChatClient`] used by all stages; each invocation of
/// [`generate_report`](Self::generate_report) is stateless and independent.
pub struct ReportPipeline<C: ChatClient> {
    client: C,
    max_transcript_chars: usize,
}

impl<C: ChatClient> ReportPipeline<C> {
    /// Build a pipeline over `client` with the configured truncation budget.
    pub fn new(client: C, config: &PipelineConfig) -> Self {
        Self {
            client,
            max_transcript_chars: config.max_transcript_chars,
        }
    }

    /// Run all three stages over `transcript` and return the structured
    /// report.
    ///
    /// Stage-1 and stage-2 failures are logged and replaced by their
    /// fallbacks; only a stage-3 failure returns `Err`.
    pub async fn generate_report(&self, transcript: &str) -> Result<ClinicalReport, StageError> {
        let excerpt = truncate_chars(transcript, self.max_transcript_chars);

        let evidence = match self.extract_evidence(excerpt).await {
            Ok(bundle) => bundle,
            Err(err) => {
                log::warn!("continuing with empty evidence bundle: {err}");
                EvidenceBundle::new()
            }
        };

        let narrative = match self.synthesize(&evidence).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("continuing with fallback narrative: {err}");
                SYNTHESIS_FALLBACK.to_string()
            }
        };

        self.structure(&narrative).await
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    /// Stage 1: deterministic evidence extraction into a best-effort bundle.
    async fn extract_evidence(&self, transcript: &str) -> Result<EvidenceBundle, StageError> {
        log::debug!(
            "stage 1: extracting evidence from {} chars",
            transcript.chars().count()
        );

        let raw = self
            .client
            .complete(&prompts::extraction_request(transcript))
            .await
            .map_err(StageError::Extraction)?;

        Ok(parse_model_json(&raw))
    }

    /// Stage 2: moderate-temperature synthesis into a four-section narrative.
    async fn synthesize(&self, evidence: &EvidenceBundle) -> Result<String, StageError> {
        log::debug!("stage 2: synthesizing narrative from {} evidence keys", evidence.len());

        let evidence_json = serde_json::Value::Object(evidence.clone()).to_string();

        self.client
            .complete(&prompts::synthesis_request(&evidence_json))
            .await
            .map_err(StageError::Synthesis)
    }

    /// Stage 3: low-temperature translation of the narrative into the report
    /// contract.
    async fn structure(&self, narrative: &str) -> Result<ClinicalReport, StageError> {
        log::debug!("stage 3: structuring report");

        let raw = self
            .client
            .complete(&prompts::structuring_request(narrative))
            .await
            .map_err(|source| StageError::Structuring {
                source,
                narrative: narrative.to_string(),
            })?;

        let map = parse_model_json(&raw);
        if map.is_empty() {
            log::error!("stage 3 output not recoverable as JSON ({} chars)", raw.len());
            return Err(StageError::Unstructured { raw });
        }

        Ok(ClinicalReport::from_map(map))
    }
}

/// Prefix-truncate `text` to at most `max_chars` characters, on a character
/// boundary.  Silent and deterministic: under-budget input passes unchanged.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
