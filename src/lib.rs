//! Clinical Supervisor — therapy-session transcription and analysis.
//!
//! Takes a recorded therapy session (or a raw transcript), transcribes it
//! through a remote speech-to-text provider, runs a three-stage language-model
//! analysis over the transcript and persists the resulting structured report.
//!
//! # Module map
//!
//! * [`config`]     — settings tree (`AppConfig`), platform paths, TOML persistence.
//! * [`llm`]        — `ChatClient` trait + OpenAI-compatible REST implementation.
//! * [`recovery`]   — fence-stripping JSON recovery parser (never fails).
//! * [`transcribe`] — remote transcription adapter with response-shape
//!   normalisation and a sentinel fallback wrapper.
//! * [`report`]     — `ClinicalReport` contract and the three-stage pipeline
//!   (evidence extraction → clinical synthesis → structuring).
//! * [`storage`]    — SQLite-backed report repository with encoded list columns.
//! * [`session`]    — orchestrator sequencing transcribe → analyze → persist.
//!
//! # Pipeline flow
//!
//! ```text
//! audio file ──▶ transcribe ──▶ ReportPipeline ──▶ ReportRepository ──▶ SessionResponse
//!                (sentinel on     EXTRACT (t=0.0)    (insert, read back    (report returned
//!                 provider fault)  SYNTHESIZE (t=0.5)  id + timestamp)      even if storage
//!                                  STRUCTURE (t=0.1)                        failed)
//! ```
//!
//! A failure in extraction or synthesis degrades to a defined fallback and the
//! pipeline keeps going; only a terminal structuring failure surfaces as an
//! error, and the orchestrator converts that into an emergency report carrying
//! the raw model text.

pub mod config;
pub mod llm;
pub mod recovery;
pub mod report;
pub mod session;
pub mod storage;
pub mod transcribe;
