//! Provider response shapes and transcript normalisation.
//!
//! Speech-to-text providers are not consistent about their output: the same
//! model can return a bare string, an object with the text under one of
//! several keys, or a list of speaker-labeled segments.  [`ProviderOutput`]
//! enumerates the shapes explicitly and [`ProviderOutput::into_transcript`]
//! applies one normalisation rule per shape, so callers always receive a
//! single formatted transcript string.

use serde_json::{Map, Value};

/// Keys tried, in order, when the provider wraps the transcript in an object.
const TEXT_KEYS: [&str; 3] = ["text", "transcription", "transcript"];

// ---------------------------------------------------------------------------
// ProviderOutput
// ---------------------------------------------------------------------------

/// The shapes a provider's `output` value can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutput {
    /// A bare transcript string.
    Text(String),
    /// An object carrying the transcript under a text-bearing key.
    Keyed(Map<String, Value>),
    /// A list of segments, each with an optional speaker tag and a text
    /// fragment.
    Segments(Vec<Value>),
    /// Anything else — coerced to its string representation as a last resort.
    Other(Value),
}

/// Classify a raw provider `output` value into one of the known shapes.
pub fn classify(value: Value) -> ProviderOutput {
    match value {
        Value::String(text) => ProviderOutput::Text(text),
        Value::Object(map) => ProviderOutput::Keyed(map),
        Value::Array(items) => ProviderOutput::Segments(items),
        other => ProviderOutput::Other(other),
    }
}

impl ProviderOutput {
    /// Normalise this output into one formatted transcript string.
    ///
    /// `label_speakers` controls whether segment lists are rendered one line
    /// per segment as `"<speaker>: <text>"` or joined into a single line.
    pub fn into_transcript(self, label_speakers: bool) -> String {
        match self {
            ProviderOutput::Text(text) => normalize_text(text),
            ProviderOutput::Keyed(map) => normalize_keyed(&map),
            ProviderOutput::Segments(items) => normalize_segments(&items, label_speakers),
            ProviderOutput::Other(value) => normalize_other(&value),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-shape normalisation
// ---------------------------------------------------------------------------

fn normalize_text(text: String) -> String {
    text
}

/// Extract the first non-empty candidate text key.  Providers disagree on the
/// key name, so several are tried in order.
fn normalize_keyed(map: &Map<String, Value>) -> String {
    for key in TEXT_KEYS {
        if let Some(text) = map.get(key).and_then(Value::as_str) {
            return text.to_string();
        }
    }
    String::new()
}

/// Concatenate segments in order.
///
/// With `label_speakers`, segments that carry a speaker tag render as one
/// `"<speaker>: <text>"` line each (per-segment whitespace trimmed).
/// Without labels — or when no segment has a tag — the text fragments are
/// joined with single spaces.
fn normalize_segments(items: &[Value], label_speakers: bool) -> String {
    let any_speaker = items
        .iter()
        .any(|seg| seg.get("speaker").and_then(Value::as_str).is_some());

    if label_speakers && any_speaker {
        let mut transcript = String::new();
        for seg in items {
            let speaker = seg
                .get("speaker")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .trim();
            let text = seg.get("text").and_then(Value::as_str).unwrap_or("").trim();
            transcript.push_str(&format!("{speaker}: {text}\n"));
        }
        transcript
    } else {
        items
            .iter()
            .filter_map(|seg| seg.get("text").and_then(Value::as_str))
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Last-resort coercion.  `null` becomes the empty string so a missing output
/// reads as "no transcript" instead of the literal text `null`.
fn normalize_other(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
