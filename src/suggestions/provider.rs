//! Generative text provider behind a trait so the gate can be exercised with
//! scripted implementations. The production client talks to the Gemini
//! `generateContent` endpoint.

use axum::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SuggestionConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no generative provider configured")]
    Disabled,
    #[error("generation request timed out")]
    Timeout,
    #[error("generation request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Opaque free-text generation; may be slow or unavailable.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: &SuggestionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            client,
        }
    }
}

#[async_trait]
impl SuggestionProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self.api_key.as_deref().ok_or(ProviderError::Disabled)?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Request(e.to_string())
                }
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Request(format!(
                "gemini api error {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::Request("empty completion".into()));
        }
        Ok(text)
    }
}
