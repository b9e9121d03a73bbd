//! Content helpers for multimodal chat messages
//!
//! This module provides:
//! - `source`: where image and file payloads come from (path, bytes or URL)
//! - `block`: the content-block wire types and the helpers that build them

mod block;
mod source;

pub use block::{
    data_uri, file_content, image_content, image_content_with_detail, image_mime_type,
    text_content, ContentBlock, FilePayload, ImageDetail, DEFAULT_FILE_MIME, DEFAULT_FILENAME,
};
pub use source::ContentSource;
