//! Application entry point — clinical session supervisor.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Open the report store and ensure its schema exists.
//! 4. Build the transcriber (sentinel-wrapped Replicate client) and the
//!    chat client from config.
//! 5. Dispatch the command: analyze one session file, or print the stored
//!    history.

use std::path::Path;

use anyhow::Result;

use clinical_supervisor::{
    config::AppConfig,
    llm::ApiChatClient,
    report::ReportPipeline,
    session::SessionOrchestrator,
    storage::{self, ReportRepository},
    transcribe::{ReplicateTranscriber, SentinelTranscriber},
};

const USAGE: &str = "\
usage:
  clinical-supervisor <audio-file>    transcribe and analyze one session
  clinical-supervisor <file.txt>      analyze an already-transcribed session
  clinical-supervisor --historial     print stored reports, newest first";

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("clinical supervisor starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    // 3. Report store
    let pool = storage::connect(&config.database.resolve_url()).await?;
    let repository = ReportRepository::new(pool);

    if command == "--historial" {
        return print_history(&repository).await;
    }

    // 4. Providers
    let transcriber =
        SentinelTranscriber::new(ReplicateTranscriber::from_config(&config.transcription));
    let pipeline = ReportPipeline::new(ApiChatClient::from_config(&config.llm), &config.pipeline);
    let orchestrator = SessionOrchestrator::new(transcriber, pipeline, repository);

    // 5. One session: a .txt input is treated as an existing transcript,
    //    anything else goes through the transcription provider.
    let path = Path::new(command);
    let response = if path.extension().and_then(|ext| ext.to_str()) == Some("txt") {
        let transcript = std::fs::read_to_string(path)?;
        orchestrator.analyze_transcript(&transcript).await
    } else {
        orchestrator.analyze_audio(path).await
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn print_history(repository: &ReportRepository) -> Result<()> {
    let history = repository.history().await?;
    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(())
}
