//! Report generation: data model, prompts and the three-stage pipeline.
//!
//! This module provides:
//! * [`ClinicalReport`] — the nine-field structured output contract.
//! * [`EvidenceBundle`] — the pipeline-internal stage-1 intermediate.
//! * [`ReportPipeline`] — extraction → synthesis → structuring over one
//!   [`ChatClient`](crate::llm::ChatClient).
//! * [`StageError`] — the terminal failures a caller can observe.
//! * [`prompts`] — Spanish prompt templates, one builder per stage.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use clinical_supervisor::config::AppConfig;
//! use clinical_supervisor::llm::ApiChatClient;
//! use clinical_supervisor::report::ReportPipeline;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiChatClient::from_config(&config.llm);
//!     let pipeline = ReportPipeline::new(client, &config.pipeline);
//!
//!     match pipeline.generate_report("Hola, vengo porque...").await {
//!         Ok(report) => println!("{:?}", report.motivo_consulta),
//!         Err(e) => eprintln!("structuring failed: {e}"),
//!     }
//! }
//! ```

pub mod model;
pub mod pipeline;
pub mod prompts;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use model::{ClinicalReport, EvidenceBundle};
pub use pipeline::{ReportPipeline, StageError};
