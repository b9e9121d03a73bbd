//! llmwrap: a thin wrapper around an OpenAI-compatible chat-completion client
//!
//! This library provides:
//! - `Llm`, which binds a client to an API key, endpoint and model and
//!   returns the trimmed text of the first completion choice
//! - Content helpers that turn text, images and files into content blocks,
//!   embedding local files and raw bytes as base64 data URIs
//! - Configuration from code or `LLMWRAP_*` environment variables
//!
//! # Example
//!
//! ```no_run
//! use llmwrap::{ImageDetail, Llm, Message};
//!
//! #[tokio::main]
//! async fn main() -> llmwrap::Result<()> {
//!     let llm = Llm::new("sk-or-...")?;
//!
//!     let messages = vec![
//!         Message::system("You are a concise assistant."),
//!         Message::user_blocks(vec![
//!             Llm::text_content("What is in this picture?"),
//!             Llm::image_content("photos/cat.png", ImageDetail::Auto)?,
//!         ]),
//!     ];
//!
//!     let reply = llm.complete(messages).await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod message;

/// Package version, fixed at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{LlmError, Result};

pub use config::{
    ClientOptions, CompletionOptions, LlmConfig, API_KEY_VARS, DEFAULT_BASE_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

pub use content::{
    data_uri, file_content, image_content, image_content_with_detail, image_mime_type,
    text_content, ContentBlock, ContentSource, FilePayload, ImageDetail, DEFAULT_FILE_MIME,
    DEFAULT_FILENAME,
};

pub use message::{Message, MessageContent, Role};

pub use client::{
    ChatRequest, ChatResponse, ChatTransport, Choice, Llm, OpenAiTransport, ResponseMessage,
};
