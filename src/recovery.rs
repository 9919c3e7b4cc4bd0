//! Fence-stripping JSON recovery parser.
//!
//! Language models asked for JSON routinely wrap their answer in markdown
//! code fences (```` ```json … ``` ````), sometimes with stray fences in the
//! middle of the text.  [`parse_model_json`] strips every fence marker
//! anywhere in the input, trims whitespace and attempts a standard JSON
//! parse.  On any failure it returns an **empty map** — this function never
//! errors and never panics, so a model's stylistic inconsistency can never
//! interrupt the pipeline.

use serde_json::{Map, Value};

/// Markers removed before parsing, in order (the tagged form first so the
/// bare fence removal does not leave a dangling `json` behind).
const FENCE_MARKERS: [&str; 2] = ["```json", "```"];

/// Parse model output that *should* be a JSON object.
///
/// Returns the parsed object, or an empty map when the input — after fence
/// stripping and trimming — is not a JSON object.
///
/// ```rust
/// use clinical_supervisor::recovery::parse_model_json;
///
/// let map = parse_model_json("```json\n{\"a\": 1}\n```");
/// assert_eq!(map.get("a"), Some(&serde_json::json!(1)));
///
/// assert!(parse_model_json("not json at all").is_empty());
/// ```
pub fn parse_model_json(raw: &str) -> Map<String, Value> {
    let mut cleaned = raw.to_string();
    for marker in FENCE_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }

    match serde_json::from_str::<Value>(cleaned.trim()) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
