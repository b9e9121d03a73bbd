//! Chat-completion transport backed by async-openai

use async_openai::{config::OpenAIConfig, Client};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::debug;

use crate::config::{ClientOptions, LlmConfig};
use crate::error::{LlmError, Result};
use crate::message::Message;

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The parts of a chat-completion response the wrapper reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Something that can run one chat-completion round trip
pub trait ChatTransport: Send + Sync {
    fn create(&self, request: ChatRequest) -> impl Future<Output = Result<ChatResponse>> + Send;
}

/// Transport for any OpenAI-compatible endpoint
///
/// Requests go through async-openai's bring-your-own-types path so content
/// blocks are sent in exactly the shape [`crate::ContentBlock`] serializes to.
#[derive(Debug, Clone)]
pub struct OpenAiTransport {
    client: Client<OpenAIConfig>,
}

impl OpenAiTransport {
    /// Create a transport bound to the config's key, endpoint and options
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(&config.api_key);

        if let Some(org_id) = &config.options.org_id {
            openai_config = openai_config.with_org_id(org_id);
        }
        if let Some(project_id) = &config.options.project_id {
            openai_config = openai_config.with_project_id(project_id);
        }

        let mut client = Client::with_config(openai_config);
        if let Some(http_client) = build_http_client(&config.options)? {
            client = client.with_http_client(http_client);
        }

        debug!("Created OpenAI-compatible transport for {}", config.base_url);

        Ok(Self { client })
    }
}

impl ChatTransport for OpenAiTransport {
    async fn create(&self, request: ChatRequest) -> Result<ChatResponse> {
        let response: ChatResponse = self.client.chat().create_byot(request).await?;
        Ok(response)
    }
}

/// Build a custom HTTP client when timeout or headers were requested
fn build_http_client(options: &ClientOptions) -> Result<Option<reqwest::Client>> {
    if options.timeout.is_none() && options.headers.is_empty() {
        return Ok(None);
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| LlmError::Config(format!("Invalid header name {:?}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| LlmError::Config(format!("Invalid value for header {}: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map(Some)
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}
