//! The `Llm` chat-completion wrapper

use tracing::{debug, warn};

use super::transport::{ChatRequest, ChatTransport, OpenAiTransport};
use crate::config::{CompletionOptions, LlmConfig};
use crate::content::{self, ContentBlock, ContentSource, ImageDetail};
use crate::error::{LlmError, Result};
use crate::message::Message;

/// Request fields owned by the wrapper; extra options may not override them
const RESERVED_FIELDS: [&str; 4] = ["model", "messages", "max_tokens", "temperature"];

/// Client for an OpenAI-compatible chat-completion API
///
/// Holds a transport bound to an API key and endpoint plus the model name,
/// and forwards messages to it. The content helpers build the blocks that
/// go into [`Message::user_blocks`].
#[derive(Debug, Clone)]
pub struct Llm<T = OpenAiTransport> {
    transport: T,
    model: String,
}

impl Llm {
    /// Create a client for the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(LlmConfig::new(api_key))
    }

    /// Create a client from a full configuration
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let transport = OpenAiTransport::new(&config)?;
        Ok(Self {
            transport,
            model: config.model,
        })
    }

    /// Create a text content block
    pub fn text_content(text: impl Into<String>) -> ContentBlock {
        content::text_content(text)
    }

    /// Create an image content block from a path, bytes or URL
    pub fn image_content(
        source: impl Into<ContentSource>,
        detail: ImageDetail,
    ) -> Result<ContentBlock> {
        content::image_content_with_detail(source, detail)
    }

    /// Create a file content block from a path or bytes
    pub fn file_content(
        source: impl Into<ContentSource>,
        mime_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<ContentBlock> {
        content::file_content(source, mime_type, filename)
    }
}

impl<T: ChatTransport> Llm<T> {
    /// Create a client over a custom transport
    pub fn with_transport(transport: T, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    /// The model requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete with the default max tokens and temperature
    pub async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        self.complete_with(messages, CompletionOptions::default())
            .await
    }

    /// Send `messages` and return the first choice's text, trimmed
    ///
    /// Upstream errors are returned unchanged inside [`LlmError::Api`].
    pub async fn complete_with(
        &self,
        messages: Vec<Message>,
        options: CompletionOptions,
    ) -> Result<String> {
        let CompletionOptions {
            max_tokens,
            temperature,
            mut extra,
        } = options;

        for field in RESERVED_FIELDS {
            if extra.remove(field).is_some() {
                warn!("Ignoring extra option {:?}, it is set by the client", field);
            }
        }

        debug!(
            "Requesting completion from {} ({} messages, max_tokens {}, temperature {})",
            self.model,
            messages.len(),
            max_tokens,
            temperature
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature,
            extra,
        };

        let response = self.transport.create(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        debug!("Completion finished: {:?}", choice.finish_reason);

        let content = choice.message.content.ok_or(LlmError::MissingContent)?;
        Ok(content.trim().to_string())
    }
}
