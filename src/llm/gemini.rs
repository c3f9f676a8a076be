//! Gemini computer-use client
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`)
//! with the computer-use tool declared for a browser environment.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, PilotError, Result};
use crate::llm::content::Content;
use crate::llm::traits::{ComputerUseModel, ModelTurn, TokenUsage};

const ENVIRONMENT_BROWSER: &str = "ENVIRONMENT_BROWSER";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [Content],
    tools: [ToolDeclaration; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclaration {
    computer_use: ComputerUse,
}

#[derive(Debug, Serialize)]
struct ComputerUse {
    environment: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    include_thoughts: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiClient {
    /// Create a client from configuration and an already-loaded API key
    pub fn from_config(config: &Config, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.model.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.model.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn request_body(history: &[Content]) -> GenerateRequest<'_> {
        GenerateRequest {
            contents: history,
            tools: [ToolDeclaration {
                computer_use: ComputerUse {
                    environment: ENVIRONMENT_BROWSER,
                },
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    include_thoughts: true,
                },
            },
        }
    }

    /// Take the first candidate; a response without one is an error
    fn into_turn(response: GenerateResponse) -> Result<ModelTurn> {
        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let candidate = match response.candidates.into_iter().next() {
            Some(c) => c,
            None => {
                let feedback = response
                    .prompt_feedback
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "none".to_string());
                return Err(PilotError::model(format!(
                    "response contained no candidates (prompt feedback: {})",
                    feedback
                )));
            }
        };

        let content = candidate.content.ok_or_else(|| {
            PilotError::model(format!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(ModelTurn { content, usage })
    }
}

#[async_trait]
impl ComputerUseModel for GeminiClient {
    async fn generate(&self, history: &[Content]) -> Result<ModelTurn> {
        log::debug!(
            "Calling {} with {} history entries",
            self.model,
            history.len()
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(history))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(PilotError::model(format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        let response: GenerateResponse = resp.json().await?;
        let turn = Self::into_turn(response)?;

        if let Some(ref usage) = turn.usage {
            log::debug!(
                "Token usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(turn)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
