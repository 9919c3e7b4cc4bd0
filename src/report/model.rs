//! Report data model — the [`ClinicalReport`] contract and the stage-1
//! intermediate.
//!
//! A `ClinicalReport` always carries all nine analysis fields.  Scalars are
//! `Option<String>` and serialise as `null` when absent; the two sequence
//! fields default to empty lists.  Consumers can therefore index any field
//! without a missing-key check, whether the report came from a fully
//! successful pipeline run, a degraded run, or the emergency constructor.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Stage-1 output: a best-effort grouping of patient-side and clinician-side
/// evidence.  Pipeline-internal, never persisted; an empty map is a valid
/// (degraded) bundle.
pub type EvidenceBundle = Map<String, Value>;

/// `motivo_consulta` marker used when the model's structured output could not
/// be recovered.
const EMERGENCY_MOTIVO: &str = "Error de formato IA";

/// `diagnostico_tecnico` marker used alongside [`EMERGENCY_MOTIVO`].
const EMERGENCY_DIAGNOSTICO: &str = "La IA no devolvió un JSON válido.";

// ---------------------------------------------------------------------------
// ClinicalReport
// ---------------------------------------------------------------------------

/// The pipeline's final structured output.
///
/// Field names are the Spanish clinical vocabulary used across the stored
/// records and the response payloads; they are part of the external contract
/// and must not be renamed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalReport {
    /// Primary presenting complaint.
    #[serde(default, deserialize_with = "scalar_field")]
    pub motivo_consulta: Option<String>,
    /// Inferred root emotion.
    #[serde(default, deserialize_with = "scalar_field")]
    pub emocion_base: Option<String>,
    /// Affected organ or symbolic correlate.
    #[serde(default, deserialize_with = "scalar_field")]
    pub organo_afectado: Option<String>,
    /// Inferred core conflict or belief.
    #[serde(default, deserialize_with = "scalar_field")]
    pub conflicto_biologico: Option<String>,
    /// Technical/theoretical explanation.
    #[serde(default, deserialize_with = "scalar_field")]
    pub diagnostico_tecnico: Option<String>,
    /// Synthesized clinical findings narrative.
    #[serde(default, deserialize_with = "scalar_field")]
    pub hallazgos_clinicos: Option<String>,
    /// Missed cues and questions, in order of appearance.
    #[serde(default, deserialize_with = "sequence_field")]
    pub oportunidades_omitidas: Vec<String>,
    /// Actionable suggestions, in order of priority.
    #[serde(default, deserialize_with = "sequence_field")]
    pub recomendaciones: Vec<String>,
    /// Executive summary.
    #[serde(default, deserialize_with = "scalar_field")]
    pub resumen_sesion: Option<String>,
    /// Persistence identifier, assigned on insert; absent before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ClinicalReport {
    /// Build a report from a parsed model-output map.
    ///
    /// Every field is extracted defensively: missing or `null` scalars stay
    /// `None`, non-string scalars are coerced to their JSON text, sequence
    /// fields accept either an array or a bare string.  This conversion never
    /// fails.
    pub fn from_map(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }

    /// Fixed fallback report used when structured output could not be
    /// recovered at all.  The model's raw text is preserved under
    /// `resumen_sesion` so no information is lost.
    pub fn emergency(raw: &str) -> Self {
        Self {
            motivo_consulta: Some(EMERGENCY_MOTIVO.to_string()),
            diagnostico_tecnico: Some(EMERGENCY_DIAGNOSTICO.to_string()),
            resumen_sesion: Some(raw.to_string()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Defensive field deserializers
// ---------------------------------------------------------------------------

/// Accept a string, `null`, or any other scalar (coerced to its JSON text).
fn scalar_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Accept an array (string entries kept, others coerced), a bare string
/// (wrapped into a one-element list), or `null`/missing (empty list).
fn sequence_field<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => vec![text],
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        Some(_) => Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
