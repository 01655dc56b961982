// src/core/llm_client.rs
//! Hosted model client (Gemini `generateContent` REST API)

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::ai::json_extract::{extract_json, JsonExtractError};
use crate::app_log;
use crate::core::config_manager::LlmConfig;

const TEMPERATURE: f32 = 0.7;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured. Add your API key in settings.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Parse(#[from] JsonExtractError),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// The endpoint URL never reaches logs or error bodies.
impl From<reqwest::Error> for LlmError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}

impl LlmError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "API_KEY_MISSING",
            Self::Http(_) => "LLM_UNREACHABLE",
            Self::Api { .. } => "LLM_API_ERROR",
            Self::Parse(_) => "LLM_BAD_OUTPUT",
            Self::EmptyContent => "LLM_EMPTY",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self, LlmError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    /// One prompt in, the first candidate's text out.
    pub async fn call_text(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        app_log!(debug, "Calling model {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_api_error(&body);
            app_log!(warn, "Model API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(LlmError::EmptyContent)
    }

    /// Call the model and parse its answer as JSON.
    pub async fn call_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, LlmError> {
        let text = self.call_text(prompt).await?;
        Ok(extract_json(&text)?)
    }
}

fn parse_api_error(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            api_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            timeout_seconds: 5,
            api_key: None,
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            LlmClient::new(&config(), "  "),
            Err(LlmError::MissingApiKey)
        ));
    }

    #[test]
    fn test_endpoint_format() {
        let client = LlmClient::new(&config(), "key").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_response_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello world"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_parse_api_error() {
        assert_eq!(
            parse_api_error(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(parse_api_error(" upstream down "), "upstream down");
    }

    #[tokio::test]
    async fn test_unreachable_model_error_hides_api_key() {
        let config = LlmConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            ..config()
        };
        let key = "AIzaSySECRETKEY0123456789abcd";
        let client = LlmClient::new(&config, key).unwrap();

        let err = client.call_text("hello").await.unwrap_err();
        assert_eq!(err.code(), "LLM_UNREACHABLE");
        assert!(!err.to_string().contains(key));
        assert!(!format!("{:?}", err).contains(key));
    }
}
