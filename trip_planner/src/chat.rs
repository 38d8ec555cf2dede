//! Chat collaborator speaking the OpenAI Responses API.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::DEFAULT_MODEL;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Http(String),

    #[error("chat provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("invalid chat response: {0}")]
    InvalidResponse(String),
}

/// One model turn. Output items are kept as sent so they can be replayed
/// into the next request verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub output: Vec<Value>,
}

/// A `function_call` output item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionCallItem {
    pub call_id: String,
    pub name: String,
    /// JSON-encoded arguments, as the model wrote them.
    pub arguments: String,
}

impl ChatResponse {
    pub fn from_output(output: Vec<Value>) -> Self {
        Self { id: None, output }
    }

    /// The function call the turn opens with, if any. Only the first item
    /// is considered.
    pub fn leading_function_call(&self) -> Result<Option<FunctionCallItem>, ChatError> {
        let Some(first) = self.output.first() else {
            return Ok(None);
        };
        if first["type"] != "function_call" {
            return Ok(None);
        }
        serde_json::from_value(first.clone())
            .map(Some)
            .map_err(|err| ChatError::InvalidResponse(format!("malformed function call: {err}")))
    }

    /// Concatenated `output_text` parts of every message item.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item["type"] == "message")
            .filter_map(|item| item["content"].as_array())
            .flatten()
            .filter(|part| part["type"] == "output_text")
            .filter_map(|part| part["text"].as_str())
            .collect()
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the conversation so far with the available tools.
    async fn respond(&self, input: &[Value], tools: &Value) -> Result<ChatResponse, ChatError>;
}

/// HTTP client for the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: OPENAI_BASE_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request body for one turn. Tool calls are one at a time.
    pub fn request_body(&self, input: &[Value], tools: &Value) -> Value {
        json!({
            "model": self.model,
            "input": input,
            "tools": tools,
            "tool_choice": "auto",
            "parallel_tool_calls": false,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn respond(&self, input: &[Value], tools: &Value) -> Result<ChatResponse, ChatError> {
        let url = format!("{}/responses", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|err| ChatError::Http(format!("Invalid API key header: {err}")))?,
        );

        tracing::debug!(model = %self.model, items = input.len(), "requesting model turn");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&self.request_body(input, tools))
            .send()
            .await
            .map_err(|err| ChatError::Http(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ChatError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(ChatError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            ChatError::InvalidResponse(format!("Failed to parse response: {err}\nBody: {body}"))
        })
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
