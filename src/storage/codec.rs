//! Sequence-field codec for the flat persisted record.
//!
//! The stored table is flat text, so the two list-valued report fields
//! travel as JSON-array text.  Encoding is deterministic (`"[]"` for an
//! empty list); decoding degrades to an empty list on any corruption so a
//! bad cell never discards the rest of its record.

/// Encode a list of strings as JSON-array text.  An empty slice encodes as
/// `"[]"`.
pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decode JSON-array text back into a list of strings.
///
/// Anything that does not parse as a JSON array of strings (corrupt text,
/// `null`, a bare string, mixed-type arrays) yields an empty list.
pub fn decode_list(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
