//! Session orchestrator: transcribe → analyze → persist → respond.
//!
//! One [`SessionOrchestrator`] call handles one session end to end.  Each
//! step has its own failure policy:
//! * an empty transcript short-circuits with an error response,
//! * a terminal pipeline failure is recovered into a report (second parse
//!   attempt, then the emergency mapping) so the caller always gets their
//!   analysis text back,
//! * a persistence failure is logged and the report is returned without an
//!   identifier.
//!
//! Calls are stateless; nothing is shared between sessions except the
//! database pool inside the repository.

use std::path::Path;

use serde::Serialize;

use crate::llm::ChatClient;
use crate::recovery::parse_model_json;
use crate::report::{ClinicalReport, ReportPipeline, StageError};
use crate::storage::ReportRepository;
use crate::transcribe::Transcriber;

/// User-facing message when no transcript could be produced.
const NO_TRANSCRIPT: &str = "No se pudo transcribir el audio.";

// ---------------------------------------------------------------------------
// SessionResponse
// ---------------------------------------------------------------------------

/// The payload returned to the caller for one analyzed session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// `"exito"` or `"error"`.
    pub estado: String,
    /// Name of the submitted audio file, when the session came from audio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_archivo: Option<String>,
    /// The full session transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcripcion: Option<String>,
    /// The structured analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analisis_ia: Option<ClinicalReport>,
    /// Present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionResponse {
    fn success(
        nombre_archivo: Option<String>,
        transcripcion: String,
        analisis_ia: ClinicalReport,
    ) -> Self {
        Self {
            estado: "exito".into(),
            nombre_archivo,
            transcripcion: Some(transcripcion),
            analisis_ia: Some(analisis_ia),
            error: None,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            estado: "error".into(),
            nombre_archivo: None,
            transcripcion: None,
            analisis_ia: None,
            error: Some(message.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionOrchestrator
// ---------------------------------------------------------------------------

/// Wires the transcription adapter, the report pipeline and the repository
/// into the per-session flow.
pub struct SessionOrchestrator<T: Transcriber, C: ChatClient> {
    transcriber: T,
    pipeline: ReportPipeline<C>,
    repository: ReportRepository,
}

impl<T: Transcriber, C: ChatClient> SessionOrchestrator<T, C> {
    /// Assemble an orchestrator from its three collaborators.
    pub fn new(transcriber: T, pipeline: ReportPipeline<C>, repository: ReportRepository) -> Self {
        Self {
            transcriber,
            pipeline,
            repository,
        }
    }

    /// Analyze a recorded session: transcribe the audio, then run the
    /// transcript flow.
    pub async fn analyze_audio(&self, audio: &Path) -> SessionResponse {
        let nombre_archivo = audio
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        log::info!(
            "analyzing session audio {}",
            nombre_archivo.as_deref().unwrap_or("<sin nombre>")
        );

        let transcript = match self.transcriber.transcribe(audio).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("transcription error treated as empty transcript: {err}");
                String::new()
            }
        };

        if transcript.trim().is_empty() {
            return SessionResponse::failure(NO_TRANSCRIPT);
        }

        self.run_analysis(nombre_archivo, transcript).await
    }

    /// Analyze an already-transcribed session (text input path).
    pub async fn analyze_transcript(&self, transcript: &str) -> SessionResponse {
        if transcript.trim().is_empty() {
            return SessionResponse::failure(NO_TRANSCRIPT);
        }
        self.run_analysis(None, transcript.to_string()).await
    }

    /// Shared tail of both entry points: pipeline, recovery, persistence.
    async fn run_analysis(
        &self,
        nombre_archivo: Option<String>,
        transcript: String,
    ) -> SessionResponse {
        let mut report = match self.pipeline.generate_report(&transcript).await {
            Ok(report) => report,
            Err(err) => recover_report(err),
        };

        match self.repository.insert(&report).await {
            Ok(stored) => report.id = Some(stored.id),
            // The caller still receives the computed report, just without an id.
            Err(err) => log::warn!("report could not be persisted: {err}"),
        }

        SessionResponse::success(nombre_archivo, transcript, report)
    }
}

/// Turn a terminal pipeline failure into a report.
///
/// The raw text carried by the error gets one more recovery-parse attempt
/// (the model sometimes answers valid JSON in the wrong stage); if that fails
/// the emergency mapping preserves the text under `resumen_sesion`.
fn recover_report(err: StageError) -> ClinicalReport {
    log::warn!("report pipeline failed terminally: {err}");

    let raw = match err {
        StageError::Structuring { narrative, .. } => narrative,
        StageError::Unstructured { raw } => raw,
        other => other.to_string(),
    };

    let map = parse_model_json(&raw);
    if map.is_empty() {
        ClinicalReport::emergency(&raw)
    } else {
        ClinicalReport::from_map(map)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::PipelineConfig;
    use crate::llm::{ChatRequest, LlmError};
    use crate::storage;
    use crate::transcribe::TranscribeError;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always yields the same transcript.
    struct FixedTranscriber(String);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio: &Path) -> Result<String, TranscribeError> {
            Ok(self.0.clone())
        }
    }

    /// Replays a fixed list of completions.
    struct ScriptedClient(Mutex<VecDeque<Result<String, String>>>);

    impl ScriptedClient {
        fn new(responses: Vec<Result<&str, &str>>) -> Self {
            Self(Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ))
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedClient {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
            match self.0.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(msg)) => Err(LlmError::Request(msg)),
                None => Err(LlmError::EmptyResponse),
            }
        }
    }

    const REPORT_JSON: &str = r#"{
        "motivo_consulta": "dermatitis",
        "emocion_base": "abandono",
        "organo_afectado": "piel",
        "conflicto_biologico": "separación",
        "diagnostico_tecnico": "conflicto de contacto",
        "hallazgos_clinicos": "síntesis",
        "oportunidades_omitidas": ["no indagó la fecha de inicio"],
        "recomendaciones": ["explorar la relación"],
        "resumen_sesion": "resumen"
    }"#;

    async fn orchestrator_over(
        transcript: &str,
        responses: Vec<Result<&str, &str>>,
    ) -> SessionOrchestrator<FixedTranscriber, ScriptedClient> {
        let pool = storage::connect("sqlite::memory:").await.unwrap();
        SessionOrchestrator::new(
            FixedTranscriber(transcript.to_string()),
            ReportPipeline::new(ScriptedClient::new(responses), &PipelineConfig::default()),
            ReportRepository::new(pool),
        )
    }

    fn audio() -> &'static Path {
        Path::new("/tmp/sesion.ogg")
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn audio_session_succeeds_end_to_end() {
        let orchestrator = orchestrator_over(
            "hola doctora",
            vec![Ok("{}"), Ok("[SÍNTESIS DIAGNÓSTICA] ..."), Ok(REPORT_JSON)],
        )
        .await;

        let response = orchestrator.analyze_audio(audio()).await;

        assert_eq!(response.estado, "exito");
        assert_eq!(response.nombre_archivo.as_deref(), Some("sesion.ogg"));
        assert_eq!(response.transcripcion.as_deref(), Some("hola doctora"));

        let report = response.analisis_ia.unwrap();
        assert_eq!(report.motivo_consulta.as_deref(), Some("dermatitis"));
        assert!(report.id.is_some(), "persisted report must carry its id");
    }

    #[tokio::test]
    async fn empty_transcript_short_circuits() {
        let orchestrator = orchestrator_over("", vec![]).await;

        let response = orchestrator.analyze_audio(audio()).await;

        assert_eq!(response.estado, "error");
        assert_eq!(
            response.error.as_deref(),
            Some("No se pudo transcribir el audio.")
        );
        assert!(response.analisis_ia.is_none());
    }

    #[tokio::test]
    async fn whitespace_transcript_short_circuits() {
        let orchestrator = orchestrator_over("  \n\t ", vec![]).await;
        let response = orchestrator.analyze_audio(audio()).await;
        assert_eq!(response.estado, "error");
    }

    #[tokio::test]
    async fn unstructured_stage_three_yields_emergency_report() {
        let orchestrator = orchestrator_over(
            "hola",
            vec![Ok("{}"), Ok("narrativa"), Ok("texto sin estructura")],
        )
        .await;

        let response = orchestrator.analyze_audio(audio()).await;

        assert_eq!(response.estado, "exito");
        let report = response.analisis_ia.unwrap();
        assert_eq!(report.motivo_consulta.as_deref(), Some("Error de formato IA"));
        assert_eq!(report.resumen_sesion.as_deref(), Some("texto sin estructura"));
        assert!(report.id.is_some(), "emergency reports are persisted too");
    }

    #[tokio::test]
    async fn parseable_narrative_survives_a_structuring_transport_failure() {
        // Stage 3's call fails, but the stage-2 "narrative" happens to be
        // valid report JSON; the second-chance parse must pick it up.
        let orchestrator = orchestrator_over(
            "hola",
            vec![Ok("{}"), Ok(r#"{"motivo_consulta": "ansiedad"}"#), Err("boom")],
        )
        .await;

        let response = orchestrator.analyze_audio(audio()).await;

        assert_eq!(response.estado, "exito");
        assert_eq!(
            response.analisis_ia.unwrap().motivo_consulta.as_deref(),
            Some("ansiedad")
        );
    }

    #[tokio::test]
    async fn persistence_failure_still_returns_the_report() {
        let pool = storage::connect("sqlite::memory:").await.unwrap();
        let repository = ReportRepository::new(pool.clone());
        sqlx::query("DROP TABLE reportes").execute(&pool).await.unwrap();

        let orchestrator = SessionOrchestrator::new(
            FixedTranscriber("hola".into()),
            ReportPipeline::new(
                ScriptedClient::new(vec![Ok("{}"), Ok("narrativa"), Ok(REPORT_JSON)]),
                &PipelineConfig::default(),
            ),
            repository,
        );

        let response = orchestrator.analyze_audio(audio()).await;

        assert_eq!(response.estado, "exito");
        let report = response.analisis_ia.unwrap();
        assert_eq!(report.motivo_consulta.as_deref(), Some("dermatitis"));
        assert!(report.id.is_none(), "no id when the insert failed");
    }

    #[tokio::test]
    async fn transcript_entry_point_skips_transcription() {
        let orchestrator = orchestrator_over(
            "ignorado",
            vec![Ok("{}"), Ok("narrativa"), Ok(REPORT_JSON)],
        )
        .await;

        let response = orchestrator
            .analyze_transcript("texto pegado por el terapeuta")
            .await;

        assert_eq!(response.estado, "exito");
        assert!(response.nombre_archivo.is_none());
        assert_eq!(
            response.transcripcion.as_deref(),
            Some("texto pegado por el terapeuta")
        );
    }

    #[tokio::test]
    async fn response_report_always_carries_all_nine_fields() {
        // Stage 3 answers with a single field; the contract still requires
        // every field to be present (null or empty) in the response payload.
        let orchestrator = orchestrator_over(
            "me duele la cabeza desde hace un mes",
            vec![Ok("{}"), Ok("narrativa"), Ok(r#"{"motivo_consulta": "cefalea"}"#)],
        )
        .await;

        let response = orchestrator.analyze_audio(audio()).await;
        let value = serde_json::to_value(response.analisis_ia.unwrap()).unwrap();
        let map = value.as_object().unwrap();

        for key in [
            "motivo_consulta",
            "emocion_base",
            "organo_afectado",
            "conflicto_biologico",
            "diagnostico_tecnico",
            "hallazgos_clinicos",
            "oportunidades_omitidas",
            "recomendaciones",
            "resumen_sesion",
        ] {
            assert!(map.contains_key(key), "missing field {key}");
        }
    }

    #[tokio::test]
    async fn empty_transcript_entry_point_rejects() {
        let orchestrator = orchestrator_over("", vec![]).await;
        let response = orchestrator.analyze_transcript("   ").await;
        assert_eq!(response.estado, "error");
    }
}
