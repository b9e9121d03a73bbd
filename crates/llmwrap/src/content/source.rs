//! Payload sources for image and file content

use std::path::{Path, PathBuf};

/// Where an image or file payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A local file, read when the content block is built
    Path(PathBuf),
    /// Raw bytes already in memory
    Bytes(Vec<u8>),
    /// A remote locator passed through as-is
    Url(String),
}

impl ContentSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Whether a string names a remote `http://` or `https://` resource
    pub fn is_url(s: &str) -> bool {
        s.starts_with("http://") || s.starts_with("https://")
    }
}

impl From<&str> for ContentSource {
    fn from(s: &str) -> Self {
        if Self::is_url(s) {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }
}

impl From<String> for ContentSource {
    fn from(s: String) -> Self {
        if Self::is_url(&s) {
            Self::Url(s)
        } else {
            Self::Path(PathBuf::from(s))
        }
    }
}

impl From<PathBuf> for ContentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ContentSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ContentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ContentSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ContentSource {
    fn from(bytes: &[u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}
