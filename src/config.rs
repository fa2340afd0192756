use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Kinetra";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP API (overridable via KINETRA_BIND).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8710";

const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Get the application data directory
/// ~/Kinetra/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Kinetra")
}

/// Default on-disk database path (overridable via KINETRA_DB).
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("kinetra.db")
}

/// Resolve the database path from the environment, falling back to the default.
pub fn db_path_from_env() -> PathBuf {
    std::env::var("KINETRA_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_db_path())
}

/// Configuration for the remote model endpoint used by program generation.
///
/// `api_key` doubles as the feature switch: when it is absent the generation
/// pipeline never calls out and serves the static fallback program instead.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Read model configuration from the environment:
    /// KINETRA_MODEL_BASE_URL, KINETRA_MODEL_API_KEY, KINETRA_MODEL,
    /// KINETRA_MODEL_TIMEOUT_SECS.
    pub fn from_env() -> Self {
        let base_url = std::env::var("KINETRA_MODEL_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_MODEL_BASE_URL.to_string());
        let api_key = std::env::var("KINETRA_MODEL_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let model =
            std::env::var("KINETRA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("KINETRA_MODEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS);

        Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        }
    }

    /// Configuration with no credential; generation always falls back.
    pub fn unconfigured() -> Self {
        Self {
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }

    /// Whether a model credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
