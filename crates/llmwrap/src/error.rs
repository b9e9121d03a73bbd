//! Error types for llmwrap operations

use async_openai::error::OpenAIError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Response contained no choices")]
    EmptyResponse,

    #[error("First choice has no text content")]
    MissingContent,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] OpenAIError),
}

pub type Result<T> = std::result::Result<T, LlmError>;
