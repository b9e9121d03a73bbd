//! Content-block wire types and the helpers that build them

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::source::ContentSource;
use crate::error::{LlmError, Result};

/// MIME type used by [`file_content`] when none is given
pub const DEFAULT_FILE_MIME: &str = "application/pdf";

/// Filename used by [`file_content`] for byte sources without a filename
pub const DEFAULT_FILENAME: &str = "uploaded_file";

/// One unit of multimodal message content
///
/// Serializes to the upstream wire shapes:
/// - `{"type": "text", "text": ...}`
/// - `{"type": "image", "url": ...}`
/// - `{"type": "file", "file": {"filename": ..., "file_data": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { url: String },
    File { file: FilePayload },
}

/// Inline file attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub filename: String,
    /// `data:<mime>;base64,<payload>`
    pub file_data: String,
}

impl ContentBlock {
    /// Text of a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Whether this block carries an image or file rather than text
    pub fn is_attachment(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }
}

/// Requested image resolution
///
/// Accepted by [`image_content_with_detail`] but not part of the image wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    #[default]
    Auto,
}

/// Build a `data:` URI embedding `bytes` as base64
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Infer an image MIME type from the file extension, defaulting to JPEG
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Read a regular file, mapping anything else to `FileNotFound`
fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(LlmError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Create a text content block
pub fn text_content(text: impl Into<String>) -> ContentBlock {
    ContentBlock::Text { text: text.into() }
}

/// Create an image content block with the default detail level
pub fn image_content(source: impl Into<ContentSource>) -> Result<ContentBlock> {
    image_content_with_detail(source, ImageDetail::default())
}

/// Create an image content block
///
/// Paths are read and embedded as a data URI typed by extension, bytes are
/// embedded as `image/jpeg`, and URLs are passed through unchanged.
pub fn image_content_with_detail(
    source: impl Into<ContentSource>,
    detail: ImageDetail,
) -> Result<ContentBlock> {
    let url = match source.into() {
        ContentSource::Path(path) => {
            let mime = image_mime_type(&path);
            let bytes = read_file(&path)?;
            debug!(
                "Encoded image {} ({} bytes, {}, detail {:?})",
                path.display(),
                bytes.len(),
                mime,
                detail
            );
            data_uri(mime, &bytes)
        }
        ContentSource::Bytes(bytes) => {
            debug!("Encoded in-memory image ({} bytes, detail {:?})", bytes.len(), detail);
            data_uri("image/jpeg", &bytes)
        }
        ContentSource::Url(url) => url,
    };

    Ok(ContentBlock::Image { url })
}

/// Create a file content block
///
/// `mime_type` defaults to [`DEFAULT_FILE_MIME`]. `filename` defaults to the
/// path's base name, or [`DEFAULT_FILENAME`] for byte sources. URL sources
/// are rejected since the payload has to be inlined.
pub fn file_content(
    source: impl Into<ContentSource>,
    mime_type: Option<&str>,
    filename: Option<&str>,
) -> Result<ContentBlock> {
    let mime_type = mime_type.unwrap_or(DEFAULT_FILE_MIME);

    let (bytes, default_name) = match source.into() {
        ContentSource::Path(path) => {
            let bytes = read_file(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
            (bytes, name)
        }
        ContentSource::Bytes(bytes) => (bytes, DEFAULT_FILENAME.to_string()),
        ContentSource::Url(url) => {
            return Err(LlmError::InvalidArgument(format!(
                "file content needs a path or bytes, got URL {}",
                url
            )));
        }
    };

    let filename = filename.map(str::to_string).unwrap_or(default_name);
    debug!("Encoded file {} ({} bytes, {})", filename, bytes.len(), mime_type);

    Ok(ContentBlock::File {
        file: FilePayload {
            filename,
            file_data: data_uri(mime_type, &bytes),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn decode_payload(uri: &str, prefix: &str) -> Vec<u8> {
        assert!(uri.starts_with(prefix), "{} does not start with {}", uri, prefix);
        general_purpose::STANDARD
            .decode(&uri[prefix.len()..])
            .unwrap()
    }

    #[test]
    fn test_text_content() {
        for text in ["", "hello", "  spaced  ", "多语言"] {
            assert_eq!(
                text_content(text),
                ContentBlock::Text {
                    text: text.to_string()
                }
            );
        }
    }

    #[test]
    fn test_image_from_bytes() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        let block = image_content(bytes.clone()).unwrap();
        let expected = format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(&bytes)
        );
        assert_eq!(block, ContentBlock::Image { url: expected });
    }

    #[test]
    fn test_image_from_png_path() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("shot.png");
        let png_signature = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        fs::write(&path, png_signature).unwrap();

        let ContentBlock::Image { url } = image_content(path.as_path()).unwrap() else {
            panic!("expected image block");
        };
        assert_eq!(decode_payload(&url, "data:image/png;base64,"), png_signature);
    }

    #[test]
    fn test_image_mime_inference() {
        assert_eq!(image_mime_type(Path::new("a.png")), "image/png");
        assert_eq!(image_mime_type(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime_type(Path::new("a.webp")), "image/webp");
        assert_eq!(image_mime_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("a.gif")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("no_extension")), "image/jpeg");
    }

    #[test]
    fn test_image_from_webp_string_path() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("Pic.WEBP");
        fs::write(&path, b"RIFF").unwrap();

        let block = image_content(path.to_str().unwrap()).unwrap();
        let ContentBlock::Image { url } = block else {
            panic!("expected image block");
        };
        assert_eq!(decode_payload(&url, "data:image/webp;base64,"), b"RIFF");
    }

    #[test]
    fn test_image_url_passthrough() {
        for url in ["https://example.com/a.jpg", "http://example.com/a.png"] {
            assert_eq!(
                image_content(url).unwrap(),
                ContentBlock::Image {
                    url: url.to_string()
                }
            );
        }
    }

    #[test]
    fn test_image_detail_not_emitted() {
        let block =
            image_content_with_detail("https://example.com/a.jpg", ImageDetail::High).unwrap();
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "image", "url": "https://example.com/a.jpg"})
        );
    }

    #[test]
    fn test_missing_path() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nope.png");

        let err = image_content(missing.as_path()).unwrap_err();
        assert!(matches!(err, LlmError::FileNotFound(ref p) if p == &missing));

        let err = file_content(missing.as_path(), None, None).unwrap_err();
        assert!(matches!(err, LlmError::FileNotFound(ref p) if p == &missing));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let temp_dir = tempdir().unwrap();
        let err = image_content(temp_dir.path()).unwrap_err();
        assert!(matches!(err, LlmError::FileNotFound(_)));
    }

    #[test]
    fn test_file_from_bytes() {
        let block = file_content(b"%PDF-1.4", Some("application/pdf"), None).unwrap();
        let ContentBlock::File { file } = block else {
            panic!("expected file block");
        };
        assert_eq!(file.filename, "uploaded_file");
        assert_eq!(
            decode_payload(&file.file_data, "data:application/pdf;base64,"),
            b"%PDF-1.4"
        );
    }

    #[test]
    fn test_file_from_path() {
        let temp_dir = tempdir().unwrap();
        let path: PathBuf = temp_dir.path().join("report.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let block = file_content(path.clone(), Some("text/csv"), None).unwrap();
        let ContentBlock::File { file } = block else {
            panic!("expected file block");
        };
        assert_eq!(file.filename, "report.csv");
        assert_eq!(decode_payload(&file.file_data, "data:text/csv;base64,"), b"a,b\n1,2\n");

        let ContentBlock::File { file } = file_content(path, None, Some("renamed.csv")).unwrap()
        else {
            panic!("expected file block");
        };
        assert_eq!(file.filename, "renamed.csv");
        assert!(file.file_data.starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn test_file_rejects_url() {
        let err = file_content("https://example.com/doc.pdf", None, None).unwrap_err();
        assert!(matches!(err, LlmError::InvalidArgument(_)));
    }

    #[test]
    fn test_wire_shapes() {
        assert_eq!(
            serde_json::to_value(text_content("hi")).unwrap(),
            json!({"type": "text", "text": "hi"})
        );

        let file = file_content(b"abc", Some("text/plain"), Some("a.txt")).unwrap();
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({
                "type": "file",
                "file": {"filename": "a.txt", "file_data": "data:text/plain;base64,YWJj"}
            })
        );
    }

    #[test]
    fn test_attachment_helpers() {
        assert_eq!(text_content("x").as_text(), Some("x"));
        assert!(!text_content("x").is_attachment());
        assert!(image_content(b"x").unwrap().is_attachment());
    }
}
