//! LLM integration for mission briefings and the intel officer chat
//!
//! This module handles communication with the Gemini `generateContent` API.
//! Callers fall back to the offline briefing catalog when it is unavailable.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::timeline::{Phase, SessionRecommendation};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const GEMINI_MODEL: &str = "gemini-2.5-flash";
const API_VERSION: &str = "v1beta";
const SYSTEM_PROMPT: &str = include_str!("prompts/intel_officer.txt");

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
  system_instruction: Content,
  contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
  #[serde(default)]
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

impl Content {
  fn text(role: Option<&str>, text: &str) -> Self {
    Self {
      role: role.map(str::to_string),
      parts: vec![Part {
        text: Some(text.to_string()),
      }],
    }
  }
}

/// ---------------------------------------------------------------------------
/// Chat History
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Model,
}

impl ChatRole {
  fn as_str(&self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Model => "model",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
  pub role: ChatRole,
  pub text: String,
}

impl ChatTurn {
  pub fn user(text: impl Into<String>) -> Self {
    Self {
      role: ChatRole::User,
      text: text.into(),
    }
  }

  pub fn model(text: impl Into<String>) -> Self {
    Self {
      role: ChatRole::Model,
      text: text.into(),
    }
  }

  /// Parse a transcript line of the form `User: ...` or `Model: ...`.
  /// Lines without a known prefix are treated as model output.
  pub fn from_transcript_line(line: &str) -> Self {
    if let Some(rest) = line.strip_prefix("User:") {
      Self::user(rest.trim_start())
    } else if let Some(rest) = line.strip_prefix("Model:") {
      Self::model(rest.trim_start())
    } else {
      Self::model(line)
    }
  }
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  api_key: String,
  base_url: String,
}

impl GeminiClient {
  pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      base_url: base_url.into(),
    }
  }

  /// Create a client from app configuration; fails when no key is set
  pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
    let api_key = config
      .gemini_api_key
      .clone()
      .ok_or(LlmError::MissingApiKey)?;

    Ok(Self::new(api_key, config.gemini_api_url.clone()))
  }

  fn endpoint(&self) -> String {
    format!(
      "{}/{}/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      API_VERSION,
      GEMINI_MODEL
    )
  }

  /// Send a conversation and return the first candidate's text
  async fn generate(&self, contents: Vec<Content>) -> Result<String, LlmError> {
    let request = GenerateRequest {
      system_instruction: Content::text(None, SYSTEM_PROMPT),
      contents,
    };

    let response = self
      .client
      .post(self.endpoint())
      .header("x-goog-api-key", &self.api_key)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let parsed: GenerateResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    parsed
      .candidates
      .into_iter()
      .filter_map(|c| c.content)
      .flat_map(|c| c.parts)
      .find_map(|p| p.text)
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))
  }

  /// Short tactical briefing for today's session context
  pub async fn mission_briefing(
    &self,
    phase: Phase,
    session: &SessionRecommendation,
    uv_index: f64,
  ) -> Result<String, LlmError> {
    let zones = if session.zones.is_empty() {
      "none".to_string()
    } else {
      session.zones.join(", ")
    };

    let prompt = format!(
      r#"Write a short military-style mission briefing (at most 3 sentences).

CURRENT PHASE: {}
TODAY'S SESSION: {} ({})
TARGET ZONES: {}
UV INDEX: {:.1}

Tone: serious, encouraging, focused on discipline. If the UV index is above 3, warn about sun exposure."#,
      phase.display_name(),
      session.session_type,
      session.label,
      zones,
      uv_index
    );

    self.generate(vec![Content::text(Some("user"), &prompt)]).await
  }

  /// Continue a conversation with the intel officer
  pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<String, LlmError> {
    let mut contents: Vec<Content> = history
      .iter()
      .map(|turn| Content::text(Some(turn.role.as_str()), &turn.text))
      .collect();
    contents.push(Content::text(Some(ChatRole::User.as_str()), message));

    self.generate(contents).await
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
