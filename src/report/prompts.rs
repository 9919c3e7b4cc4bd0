//! Prompt templates and request builders for the three analysis stages.
//!
//! Each builder returns a ready-to-send [`ChatRequest`] with the stage's
//! fixed temperature and output mode baked in:
//! * **Extraction** — temperature 0.0, JSON mode.
//! * **Synthesis** — temperature 0.5, free prose.
//! * **Structuring** — temperature 0.1, JSON mode.
//!
//! All instructions are in Spanish, the working language of the sessions and
//! the stored reports.

use crate::llm::ChatRequest;

// ---------------------------------------------------------------------------
// Stage 1 — evidence extraction
// ---------------------------------------------------------------------------

const EXTRACTION_SYSTEM: &str = "\
ACTÚA COMO: Un asistente de documentación clínica.
TU TAREA: Extraer evidencia literal de la transcripción de una sesión de terapia.

EXTRAE:
1. EVIDENCIA DEL PACIENTE: frases de creencias, metáforas sobre el síntoma,
   menciones de historia familiar.
2. EVIDENCIA DEL TERAPEUTA: preguntas efectivas que abrieron información,
   momentos clave que quedaron sin indagar.

FORMATO DE RESPUESTA:
Responde ÚNICAMENTE con un objeto JSON con las claves:
\"evidencia_paciente\" (objeto con \"creencias\", \"metaforas_sintoma\",
\"historia_familiar\", cada una lista de citas) y
\"evidencia_terapeuta\" (objeto con \"preguntas_efectivas\",
\"momentos_omitidos\", cada una lista de citas).
No inventes contenido: si una categoría no tiene evidencia, deja la lista vacía.";

/// Build the stage-1 request for a (possibly truncated) transcript.
pub fn extraction_request(transcript: &str) -> ChatRequest {
    let user = format!("Transcripción de la sesión:\n\n{transcript}");
    ChatRequest::new(EXTRACTION_SYSTEM, user)
        .temperature(0.0)
        .json_mode()
}

// ---------------------------------------------------------------------------
// Stage 2 — clinical synthesis
// ---------------------------------------------------------------------------

const SYNTHESIS_SYSTEM: &str = "\
ACTÚA COMO: Un Supervisor Clínico Senior experto en Biodecodificación, NMG y PNL.
TU TAREA: Analizar la evidencia extraída de una sesión de terapia y redactar
un informe de supervisión para el terapeuta.

ESTRUCTURA DEL INFORME (usa exactamente estos cuatro encabezados):
[SÍNTESIS DIAGNÓSTICA] Malestar principal, emoción de base, órgano o correlato
simbólico afectado y las creencias nucleares que sostienen el conflicto.
[ANÁLISIS DE LA INTERVENCIÓN] Qué hizo bien el terapeuta y qué momentos clave
quedaron sin indagar.
[LÍNEAS DE ACCIÓN PROPUESTAS] Sugerencias concretas y preguntas para la
próxima sesión.
[APUNTE TEÓRICO] La lectura técnica del caso según el marco de
Biodecodificación.

FORMATO DE RESPUESTA:
Redacta en prosa profesional, dirigida al terapeuta. No uses JSON.";

/// Build the stage-2 request from the serialized evidence bundle.
pub fn synthesis_request(evidence_json: &str) -> ChatRequest {
    let user = format!("Evidencia extraída de la sesión:\n\n{evidence_json}");
    ChatRequest::new(SYNTHESIS_SYSTEM, user).temperature(0.5)
}

// ---------------------------------------------------------------------------
// Stage 3 — structuring
// ---------------------------------------------------------------------------

const STRUCTURING_SYSTEM: &str = "\
ACTÚA COMO: Un transcriptor de informes clínicos a formato estructurado.
TU TAREA: Convertir un informe de supervisión con los encabezados
[SÍNTESIS DIAGNÓSTICA], [ANÁLISIS DE LA INTERVENCIÓN],
[LÍNEAS DE ACCIÓN PROPUESTAS] y [APUNTE TEÓRICO] en un objeto JSON.

REGLAS DE MAPEO (campo por campo):
- \"motivo_consulta\": el tema principal de la SÍNTESIS DIAGNÓSTICA.
- \"emocion_base\": la emoción de base identificada en la SÍNTESIS DIAGNÓSTICA.
- \"organo_afectado\": el órgano o correlato simbólico de la SÍNTESIS DIAGNÓSTICA.
- \"conflicto_biologico\": las creencias nucleares de la SÍNTESIS DIAGNÓSTICA.
- \"hallazgos_clinicos\": la SÍNTESIS DIAGNÓSTICA completa.
- \"diagnostico_tecnico\": el APUNTE TEÓRICO.
- \"oportunidades_omitidas\": lista de cadenas con el contenido completo del
  ANÁLISIS DE LA INTERVENCIÓN.
- \"recomendaciones\": lista de cadenas con las LÍNEAS DE ACCIÓN PROPUESTAS.
- \"resumen_sesion\": un resumen ejecutivo breve redactado por ti.

FORMATO DE RESPUESTA:
Responde ÚNICAMENTE con el objeto JSON. Si un campo no aparece en el informe,
usa null (o una lista vacía para los campos de lista).";

/// Build the stage-3 request for a four-section narrative.
pub fn structuring_request(narrative: &str) -> ChatRequest {
    let user = format!("Informe de supervisión:\n\n{narrative}");
    ChatRequest::new(STRUCTURING_SYSTEM, user)
        .temperature(0.1)
        .json_mode()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_request_is_deterministic_json() {
        let request = extraction_request("hola doctora");

        assert_eq!(request.temperature, 0.0);
        assert!(request.json_mode);
        assert!(request.system.contains("EVIDENCIA DEL PACIENTE"));
        assert!(request.user.contains("hola doctora"));
    }

    #[test]
    fn synthesis_request_is_moderate_prose() {
        let request = synthesis_request("{\"evidencia_paciente\": {}}");

        assert_eq!(request.temperature, 0.5);
        assert!(!request.json_mode);
        assert!(request.system.contains("[SÍNTESIS DIAGNÓSTICA]"));
        assert!(request.system.contains("[APUNTE TEÓRICO]"));
        assert!(request.user.contains("evidencia_paciente"));
    }

    #[test]
    fn structuring_request_maps_every_report_field() {
        let request = structuring_request("[SÍNTESIS DIAGNÓSTICA] ...");

        assert_eq!(request.temperature, 0.1);
        assert!(request.json_mode);
        for field in [
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
            assert!(
                request.system.contains(field),
                "mapping rules must mention {field}"
            );
        }
    }

    #[test]
    fn narrative_is_embedded_verbatim() {
        let narrative = "[SÍNTESIS DIAGNÓSTICA] dermatitis por separación";
        let request = structuring_request(narrative);
        assert!(request.user.contains(narrative));
    }
}
