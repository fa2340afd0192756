use serde::{Deserialize, Serialize};

use super::types::ModelClient;
use super::ProgramError;

/// Sampling temperature for program generation. Low on purpose: we want
/// schema-faithful JSON, not creative prose.
const TEMPERATURE: f32 = 0.3;

/// OpenAI-compatible chat-completions client over blocking HTTP.
pub struct OpenAiCompatClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiCompatClient {
    /// Create a client for any OpenAI-compatible endpoint.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for {base_url}/chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from {base_url}/chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ModelClient for OpenAiCompatClient {
    fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, ProgramError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ProgramError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ProgramError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ProgramError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProgramError::ModelError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ProgramError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProgramError::ResponseParsing("empty choices array".to_string()))
    }
}

/// Mock model client for testing. Returns a configurable response.
pub struct MockModelClient {
    response: String,
}

impl MockModelClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl ModelClient for MockModelClient {
    fn complete(&self, _model: &str, _system: &str, _prompt: &str) -> Result<String, ProgramError> {
        Ok(self.response.clone())
    }
}
