//! Persistence layer: the flat `reportes` table and its field codec.
//!
//! This module provides:
//! * [`connect`] — open (or create) the database and ensure the schema.
//! * [`ReportRepository`] — insert reports and read decoded history.
//! * [`StoredReport`] / [`ReportRecord`] — insert identity and history rows.
//! * [`codec`] — the JSON-array text encoding for list-valued fields.
//! * [`StorageError`] — error variants for persistence operations.

pub mod codec;
pub mod repository;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use codec::{decode_list, encode_list};
pub use repository::{connect, ReportRecord, ReportRepository, StorageError, StoredReport};
