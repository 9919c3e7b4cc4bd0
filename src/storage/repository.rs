//! SQLite-backed report repository.
//!
//! One flat table, `reportes`, holds every persisted report.  The repository
//! copies scalar fields through as-is, encodes the two list fields with the
//! [`codec`](crate::storage::codec), and lets the database assign the
//! identifier and creation timestamp on insert.

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

use crate::report::ClinicalReport;
use crate::storage::codec::{decode_list, encode_list};

/// Stored in `hallazgos_clinicos` when the pipeline produced none.
const DEFAULT_HALLAZGOS: &str = "Sin hallazgos.";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS reportes (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    motivo_consulta        TEXT,
    emocion_base           TEXT,
    organo_afectado        TEXT,
    conflicto_biologico    TEXT,
    diagnostico_tecnico    TEXT,
    hallazgos_clinicos     TEXT,
    oportunidades_omitidas TEXT,
    recomendaciones        TEXT,
    resumen_sesion         TEXT,
    created_at             TEXT NOT NULL DEFAULT (datetime('now'))
)";

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection, schema or query failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Open (creating if missing) the database at `url` and ensure the schema
/// exists.
pub async fn connect(url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    sqlx::query(SCHEMA).execute(&pool).await?;

    Ok(pool)
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// The database-assigned identity of a freshly inserted report.
#[derive(Debug, Clone)]
pub struct StoredReport {
    /// Auto-increment identifier.
    pub id: i64,
    /// Creation timestamp, as stored.
    pub created_at: String,
}

/// One decoded history entry: the nine report fields plus identity.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub id: i64,
    /// Creation timestamp, as stored.
    pub fecha: String,
    pub motivo_consulta: Option<String>,
    pub emocion_base: Option<String>,
    pub organo_afectado: Option<String>,
    pub conflicto_biologico: Option<String>,
    pub diagnostico_tecnico: Option<String>,
    pub hallazgos_clinicos: Option<String>,
    pub oportunidades_omitidas: Vec<String>,
    pub recomendaciones: Vec<String>,
    pub resumen_sesion: Option<String>,
}

type HistoryRow = (
    i64,            // id
    String,         // created_at
    Option<String>, // motivo_consulta
    Option<String>, // emocion_base
    Option<String>, // organo_afectado
    Option<String>, // conflicto_biologico
    Option<String>, // diagnostico_tecnico
    Option<String>, // hallazgos_clinicos
    Option<String>, // oportunidades_omitidas (encoded)
    Option<String>, // recomendaciones (encoded)
    Option<String>, // resumen_sesion
);

// ---------------------------------------------------------------------------
// ReportRepository
// ---------------------------------------------------------------------------

/// Insert and read back clinical reports.
#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Wrap an already-connected pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist `report` and return its database-assigned identity.
    ///
    /// Scalars are copied through (a missing findings narrative is stored as
    /// a fixed placeholder); list fields are JSON-encoded.  The caller is
    /// expected to inject the returned id into the in-memory report.
    pub async fn insert(&self, report: &ClinicalReport) -> Result<StoredReport, StorageError> {
        let hallazgos = report
            .hallazgos_clinicos
            .clone()
            .unwrap_or_else(|| DEFAULT_HALLAZGOS.to_string());

        let (id, created_at): (i64, String) = sqlx::query_as(
            "INSERT INTO reportes (
                motivo_consulta, emocion_base, organo_afectado,
                conflicto_biologico, diagnostico_tecnico, hallazgos_clinicos,
                oportunidades_omitidas, recomendaciones, resumen_sesion
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id, created_at",
        )
        .bind(&report.motivo_consulta)
        .bind(&report.emocion_base)
        .bind(&report.organo_afectado)
        .bind(&report.conflicto_biologico)
        .bind(&report.diagnostico_tecnico)
        .bind(&hallazgos)
        .bind(encode_list(&report.oportunidades_omitidas))
        .bind(encode_list(&report.recomendaciones))
        .bind(&report.resumen_sesion)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("report persisted with id {id}");

        Ok(StoredReport { id, created_at })
    }

    /// Return all persisted reports, newest first.
    ///
    /// The two encoded list fields are decoded per row; a corrupt cell
    /// degrades to an empty list for that field only.
    pub async fn history(&self) -> Result<Vec<ReportRecord>, StorageError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT id, created_at, motivo_consulta, emocion_base,
                    organo_afectado, conflicto_biologico, diagnostico_tecnico,
                    hallazgos_clinicos, oportunidades_omitidas, recomendaciones,
                    resumen_sesion
             FROM reportes
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }
}

fn record_from_row(row: HistoryRow) -> ReportRecord {
    let (
        id,
        fecha,
        motivo_consulta,
        emocion_base,
        organo_afectado,
        conflicto_biologico,
        diagnostico_tecnico,
        hallazgos_clinicos,
        oportunidades,
        recomendaciones,
        resumen_sesion,
    ) = row;

    ReportRecord {
        id,
        fecha,
        motivo_consulta,
        emocion_base,
        organo_afectado,
        conflicto_biologico,
        diagnostico_tecnico,
        hallazgos_clinicos,
        oportunidades_omitidas: oportunidades.as_deref().map(decode_list).unwrap_or_default(),
        recomendaciones: recomendaciones.as_deref().map(decode_list).unwrap_or_default(),
        resumen_sesion,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
