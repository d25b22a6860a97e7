//! Groq chat-completions client: the multimodal inference call.
//!
//! Sends the prompt and the image (as a data URL) in one user message and
//! returns the raw assistant text. Everything after that is the
//! post-processing pipeline's job.

use std::future::Future;

use crate::image_input::ImageData;

use super::prompts::{MAX_TOKENS, MODEL, TEMPERATURE};

pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// A model that answers a text prompt about one image.
pub trait VisionModel {
    fn complete(
        &self,
        prompt: &str,
        image: &ImageData,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

pub struct GroqClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl GroqClient {
    /// Fails with `MissingApiKey` when the key is absent or blank.
    pub fn new(api_key: Option<&str>, model: Option<&str>) -> Result<Self, LlmError> {
        let api_key = match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                log::warn!("[LLM] No GROQ_API_KEY set");
                return Err(LlmError::MissingApiKey);
            }
        };

        Ok(Self {
            api_key,
            model: model.unwrap_or(MODEL).to_string(),
            http: reqwest::Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl VisionModel for GroqClient {
    async fn complete(&self, prompt: &str, image: &ImageData) -> Result<String, LlmError> {
        log::info!("[LLM] Provider: groq");
        log::info!("[LLM] Model: {}", self.model);

        let start = std::time::Instant::now();

        let response = self
            .http
            .post(GROQ_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&build_request_body(&self.model, prompt, image))
            .send()
            .await
            .map_err(|e| {
                log::error!("[LLM] HTTP request failed: {}", e);
                LlmError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[LLM] API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());

        if let Some(usage) = body.get("usage") {
            log::info!(
                "[LLM] Tokens: {} in, {} out",
                usage["prompt_tokens"].as_u64().unwrap_or(0),
                usage["completion_tokens"].as_u64().unwrap_or(0)
            );
        }

        extract_content(&body)
    }
}

/// OpenAI-compatible request body: one user message with a text part and
/// an image part.
pub fn build_request_body(model: &str, prompt: &str, image: &ImageData) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
        "messages": [
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image.to_data_url() } }
                ]
            }
        ]
    })
}

/// Pull `choices[0].message.content` out of a response body.
///
/// A `null` content is an empty answer, not an error.
pub fn extract_content(body: &serde_json::Value) -> Result<String, LlmError> {
    let message = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| LlmError::MalformedResponse("no choices[0].message".to_string()))?;

    match message.get("content") {
        Some(serde_json::Value::String(text)) => Ok(text.clone()),
        Some(serde_json::Value::Null) | None => Ok(String::new()),
        Some(other) => Err(LlmError::MalformedResponse(format!(
            "content is not a string: {}",
            other
        ))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    pub fn message_key(&self) -> &'static str {
        match self {
            LlmError::MissingApiKey => "error_api_key_missing",
            _ => "error_analysis",
        }
    }
}
