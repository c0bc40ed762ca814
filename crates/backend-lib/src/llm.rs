// ============================
// promptdesk-backend-lib/src/llm.rs
// ============================
//! Inference proxy: model registry plus a chat-completion backend.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// Default completion budget when the request does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 150;

const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Model keys exposed by the API, mapped to hosted model repositories.
pub const MODEL_REGISTRY: &[(&str, &str)] = &[
    ("mistral", "mistralai/Mistral-7B-Instruct-v0.2"),
    ("zephyr", "HuggingFaceH4/zephyr-7b-beta"),
    ("llama", "meta-llama/Llama-3.2-3B-Instruct"),
];

fn repo_for(model: &str) -> Option<&'static str> {
    MODEL_REGISTRY
        .iter()
        .find(|(key, _)| *key == model)
        .map(|(_, repo)| *repo)
}

/// One call against a hosted chat-completion API. The rest of the crate
/// only ever sees this trait, so tests swap in a canned backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn chat_completion(
        &self,
        model_repo: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, AppError>;
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Backend for the HuggingFace inference router (OpenAI-compatible
/// `POST {base}/chat/completions`).
pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(api_token: String, base_url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_token,
            base_url,
        })
    }
}

#[async_trait]
impl InferenceBackend for HuggingFaceClient {
    async fn chat_completion(
        &self,
        model_repo: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let body = ChatCompletionRequest {
            model: model_repo.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Inference(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Inference(format!(
                "provider returned {status} for {model_repo}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Inference(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AppError::Inference("provider returned no choices".to_string()))
    }
}

/// Proxies prompts to whichever registered model is currently selected.
pub struct LlmService {
    backend: Arc<dyn InferenceBackend>,
    current: RwLock<String>,
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl LlmService {
    /// Fails with `UnknownModel` when `default_model` is not registered.
    pub fn new(backend: Arc<dyn InferenceBackend>, default_model: &str) -> Result<Self, AppError> {
        if repo_for(default_model).is_none() {
            return Err(AppError::UnknownModel(default_model.to_string()));
        }

        Ok(Self {
            backend,
            current: RwLock::new(default_model.to_string()),
        })
    }

    pub fn available_models(&self) -> Vec<String> {
        MODEL_REGISTRY.iter().map(|(key, _)| key.to_string()).collect()
    }

    pub fn current_model(&self) -> String {
        self.current.read().clone()
    }

    /// Select a different registered model for subsequent queries.
    pub fn switch_model(&self, model: &str) -> Result<String, AppError> {
        if repo_for(model).is_none() {
            return Err(AppError::UnknownModel(model.to_string()));
        }

        *self.current.write() = model.to_string();
        debug!(model, "switched model");
        Ok(format!("Switched to {model}"))
    }

    /// Generate a completion with the current model; returns the text and
    /// the model key that produced it.
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<(String, String), AppError> {
        let model = self.current_model();
        let repo = repo_for(&model).ok_or_else(|| AppError::UnknownModel(model.clone()))?;

        let text = self
            .backend
            .chat_completion(repo, prompt, max_tokens)
            .await?;
        Ok((text, model))
    }
}
