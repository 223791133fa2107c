//! Remote explanation through an OpenAI-compatible chat-completions API
//! (OpenRouter by default).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stillrisk_core::models::input::ClinicalInput;

use crate::error::ExplainError;
use crate::request::{Explainer, ExplanationRequest};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub const SYSTEM_PROMPT: &str = "You are a clinical assistant explaining stillbirth risk levels \
in 2–4 short, factual bullet points. \
Avoid diagnosis or treatment; focus on explaining the contributing factors.";

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 200;
const APP_TITLE: &str = "Stillbirth Risk Assessment";

/// Most bullets kept from a model response.
pub const MAX_BULLETS: usize = 4;

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"********")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct OpenRouterExplainer {
    config: OpenRouterConfig,
    agent: ureq::Agent,
}

impl OpenRouterExplainer {
    pub fn new(config: OpenRouterConfig) -> Result<Self, ExplainError> {
        if config.api_key.trim().is_empty() {
            return Err(ExplainError::MissingApiKey("api_key".to_string()));
        }
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        let agent = ureq::Agent::new_with_config(agent_config);

        info!(model = %config.model, base_url = %config.base_url, "remote explainer enabled");
        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl Explainer for OpenRouterExplainer {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn explain(&self, request: &ExplanationRequest<'_>) -> Result<Vec<String>, ExplainError> {
        let user_prompt = user_prompt(request)?;
        let body = serde_json::to_string(&ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })?;

        debug!(model = %self.config.model, "requesting remote explanation");

        let mut response = self
            .agent
            .post(&self.endpoint())
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", APP_TITLE)
            .send(body)?;

        let text = response.body_mut().read_to_string()?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ExplainError::ResponseParse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ExplainError::EmptyResponse)?;

        parse_bullets(&content)
    }
}

/// The user message: language, band with percentage, and the supplied inputs.
pub fn user_prompt(request: &ExplanationRequest<'_>) -> Result<String, ExplainError> {
    Ok(format!(
        "Language: {}\nRisk Level: {} ({}%)\nInputs: {}",
        request.language.english_name(),
        request.band.label(request.language),
        request.percentage,
        supplied_inputs(request.input)?,
    ))
}

/// Input record as compact JSON, leaving out fields that were not supplied.
fn supplied_inputs(input: &ClinicalInput) -> Result<String, ExplainError> {
    let mut value = serde_json::to_value(input)?;
    if let Some(fields) = value.as_object_mut() {
        fields.retain(|_, v| !v.is_null());
    }
    Ok(value.to_string())
}

/// Split a model response into bullets.
///
/// Leading and trailing `-`, `•` and whitespace are stripped from each line,
/// empty lines are dropped and at most [`MAX_BULLETS`] are kept. When no line
/// survives, the whole trimmed text is the single bullet.
pub fn parse_bullets(text: &str) -> Result<Vec<String>, ExplainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExplainError::EmptyResponse);
    }

    let bullets: Vec<String> = text
        .lines()
        .map(|line| line.trim_matches(|c: char| c == '-' || c == '•' || c.is_whitespace()))
        .filter(|line| !line.is_empty())
        .take(MAX_BULLETS)
        .map(str::to_string)
        .collect();

    if bullets.is_empty() {
        Ok(vec![text.to_string()])
    } else {
        Ok(bullets)
    }
}
