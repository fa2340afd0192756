use tracing::{info, warn};

use crate::config::ModelConfig;

use super::client::OpenAiCompatClient;
use super::fallback::fallback_program;
use super::normalize::normalize_program;
use super::parser::parse_program;
use super::prompt::{build_program_prompt, PROGRAM_SYSTEM_PROMPT};
use super::types::{AssessmentData, GenerationOutcome, ModelClient};
use super::ProgramError;

/// Confidence recorded for model-authored programs.
pub const AI_CONFIDENCE: f64 = 0.85;
/// Confidence recorded when the static fallback program is served.
pub const FALLBACK_CONFIDENCE: f64 = 0.2;
/// Confidence recorded for red-flagged submissions, which never reach a model.
pub const FLAGGED_CONFIDENCE: f64 = 0.0;

/// Drives exercise program generation: one model call, then parse and
/// normalize, with the static fallback covering every failure path.
///
/// A generator built without a credential holds no client at all, so a
/// missing API key can never leak a network request.
pub struct ProgramGenerator {
    client: Option<Box<dyn ModelClient + Send + Sync>>,
    model: String,
}

impl ProgramGenerator {
    pub fn from_config(config: &ModelConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            Box::new(OpenAiCompatClient::new(
                &config.base_url,
                key,
                config.timeout_secs,
            )) as Box<dyn ModelClient + Send + Sync>
        });
        Self {
            client,
            model: config.model.clone(),
        }
    }

    /// Build a generator around an existing client. Used by tests and
    /// anywhere a non-HTTP client needs to stand in.
    pub fn with_client(client: Box<dyn ModelClient + Send + Sync>, model: &str) -> Self {
        Self {
            client: Some(client),
            model: model.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a program from assessment data.
    ///
    /// Never retries and never fails: any error on the model path degrades
    /// to the fallback program, with the error preserved in the outcome.
    /// An unconfigured generator skips the call entirely and reports no error.
    pub fn generate(&self, data: &AssessmentData) -> GenerationOutcome {
        let Some(client) = self.client.as_ref() else {
            info!("No model credential configured, serving fallback program");
            return GenerationOutcome {
                program: fallback_program(),
                is_fallback: true,
                error: None,
            };
        };

        let prompt = build_program_prompt(data);
        let raw = match client.complete(&self.model, PROGRAM_SYSTEM_PROMPT, &prompt) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Program generation request failed: {e}");
                return degraded_outcome(e);
            }
        };

        match parse_program(&raw).and_then(normalize_program) {
            Ok(program) => GenerationOutcome {
                program,
                is_fallback: false,
                error: None,
            },
            Err(e) => {
                warn!("Model response unusable, serving fallback program: {e}");
                degraded_outcome(e)
            }
        }
    }
}

fn degraded_outcome(error: ProgramError) -> GenerationOutcome {
    GenerationOutcome {
        program: fallback_program(),
        is_fallback: true,
        error: Some(error.to_string()),
    }
}
