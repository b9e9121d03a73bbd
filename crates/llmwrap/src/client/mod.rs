//! Model client module
//!
//! This module provides:
//! - `transport`: the request/response types and the OpenAI-compatible transport
//! - `llm`: the `Llm` wrapper that forwards messages and extracts the reply

mod llm;
mod transport;

pub use llm::Llm;
pub use transport::{
    ChatRequest, ChatResponse, ChatTransport, Choice, OpenAiTransport, ResponseMessage,
};
