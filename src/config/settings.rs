//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! API keys may be left out of the settings file entirely; the accessors fall
//! back to the conventional environment variables (`REPLICATE_API_TOKEN`,
//! `DEEPSEEK_API_KEY`, `DATABASE_URL`) so deployments can keep secrets out of
//! the config dir.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TranscriptionConfig
// ---------------------------------------------------------------------------

/// Settings for the remote speech-to-text provider (Replicate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of the prediction API.
    pub base_url: String,
    /// API token — `None` means read `REPLICATE_API_TOKEN` from the environment.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"vaibhavs10/incredibly-fast-whisper"`).
    pub model: String,
    /// Pinned model version id.  `None` lets the provider pick the latest.
    pub version: Option<String>,
    /// Expected speech language as an ISO-639-1 name understood by the model.
    pub language: String,
    /// Inference batch size — higher is faster on long recordings.
    pub batch_size: u32,
    /// Render segment lists as `"<speaker>: <text>"` lines when the provider
    /// returns speaker-labeled output.
    pub label_speakers: bool,
    /// Maximum seconds to wait for the prediction before timing out.
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.replicate.com".into(),
            api_key: None,
            model: "vaibhavs10/incredibly-fast-whisper".into(),
            version: None,
            language: "spanish".into(),
            batch_size: 24,
            label_speakers: true,
            timeout_secs: 300,
        }
    }
}

impl TranscriptionConfig {
    /// API token from the settings file, or `REPLICATE_API_TOKEN` when unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "REPLICATE_API_TOKEN")
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the analysis language model.
///
/// Any OpenAI-compatible `/chat/completions` endpoint works; the default is
/// DeepSeek.  Sampling temperature is **not** configured here — each pipeline
/// stage fixes its own temperature as part of its design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// API key — `None` means read `DEEPSEEK_API_KEY` from the environment.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"deepseek-chat"`).
    pub model: String,
    /// Maximum seconds to wait for a completion before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".into(),
            api_key: None,
            model: "deepseek-chat".into(),
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// API key from the settings file, or `DEEPSEEK_API_KEY` when unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "DEEPSEEK_API_KEY")
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Settings for the report pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Character budget for the evidence-extraction stage.  Longer transcripts
    /// are silently cut to this prefix before the first model call.
    pub max_transcript_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_transcript_chars: 4_000,
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Settings for the report store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL.  `None` means read `DATABASE_URL` from the environment,
    /// falling back to a local SQLite file under the platform data dir.
    pub url: Option<String>,
}

impl DatabaseConfig {
    /// Resolve the effective connection URL.
    ///
    /// Order: explicit config value → `DATABASE_URL` environment variable →
    /// local SQLite file.  Hosting platforms hand out `postgres://` URLs but
    /// the driver expects the `postgresql://` scheme, so that prefix is
    /// normalised here.
    pub fn resolve_url(&self) -> String {
        let from_env = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let url = self
            .url
            .clone()
            .filter(|s| !s.is_empty())
            .or(from_env)
            .unwrap_or_else(|| {
                format!(
                    "sqlite://{}?mode=rwc",
                    AppPaths::new().database_file.display()
                )
            });

        if let Some(rest) = url.strip_prefix("postgres://") {
            format!("postgresql://{rest}")
        } else {
            url
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use clinical_supervisor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote transcription settings.
    pub transcription: TranscriptionConfig,
    /// Analysis language-model settings.
    pub llm: LlmConfig,
    /// Report-pipeline settings.
    pub pipeline: PipelineConfig,
    /// Report-store settings.
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns the explicit key when non-empty, otherwise the named environment
/// variable when set and non-empty.
fn resolve_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    match explicit {
        Some(key) if !key.is_empty() => Some(key.to_string()),
        _ => std::env::var(env_var).ok().filter(|v| !v.is_empty()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
