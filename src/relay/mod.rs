//! PDF-to-LaTeX document relay
//!
//! Uploaded bytes are written to a scoped temporary directory, handed to the
//! configured [`TextExtractor`], escaped and wrapped in a fixed LaTeX article.

pub mod extractor;
pub mod latex;

use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::errors::{Result, ShortifyError};

pub use extractor::{ExternalToolExtractor, TextExtractor, UnavailableExtractor, probe};
pub use latex::{PLACEHOLDER_TEXT, escape_latex, render_document};

/// Name of the uploaded file inside the scratch directory
const INPUT_FILENAME: &str = "upload.pdf";

pub struct DocumentRelay {
    extractor: Arc<dyn TextExtractor>,
}

impl DocumentRelay {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &Arc<dyn TextExtractor> {
        &self.extractor
    }

    /// Convert uploaded bytes into a complete LaTeX document.
    ///
    /// Only temp-storage failures are errors. A missing tool or a failed
    /// extraction yields the placeholder document.
    pub async fn convert(&self, file_bytes: &[u8]) -> Result<String> {
        // TempDir 在 drop 时删除目录，所有返回路径都会清理
        let scratch = TempDir::with_prefix("shortify-relay-").map_err(|e| {
            ShortifyError::file_operation(format!("Failed to create temp dir: {}", e))
        })?;
        let input = scratch.path().join(INPUT_FILENAME);

        tokio::fs::write(&input, file_bytes).await.map_err(|e| {
            ShortifyError::file_operation(format!("Failed to write uploaded file: {}", e))
        })?;
        debug!(
            "Stored upload ({} bytes) at {}",
            file_bytes.len(),
            input.display()
        );

        let text = match self.extractor.extract(&input).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction failed, using placeholder: {}", e);
                PLACEHOLDER_TEXT.to_string()
            }
        };

        Ok(render_document(&escape_latex(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};

    /// Records the input path and whether it existed during extraction.
    struct RecordingExtractor {
        seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
        reply: Result<String>,
    }

    #[async_trait]
    impl TextExtractor for RecordingExtractor {
        async fn extract(&self, input: &Path) -> Result<String> {
            let bytes = std::fs::read(input).unwrap_or_default();
            *self.seen.lock() = Some((input.to_path_buf(), bytes));
            self.reply.clone()
        }

        fn name(&self) -> String {
            "recording".to_string()
        }
    }

    fn recording(reply: Result<String>) -> Arc<RecordingExtractor> {
        Arc::new(RecordingExtractor {
            seen: Mutex::new(None),
            reply,
        })
    }

    #[tokio::test]
    async fn test_convert_escapes_extracted_text() {
        let extractor = recording(Ok("Profit & loss: 50% of $x_1".to_string()));
        let relay = DocumentRelay::new(extractor.clone());

        let doc = relay.convert(b"%PDF-1.4 fake").await.unwrap();
        assert!(doc.contains("Profit \\& loss: 50\\% of \\$x\\_1"));
        assert!(doc.starts_with("\\documentclass{article}"));

        let (path, bytes) = extractor.seen.lock().clone().unwrap();
        assert_eq!(bytes, b"%PDF-1.4 fake");
        // 转换结束后临时文件已被清理
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn test_convert_failure_uses_placeholder() {
        let extractor = recording(Err(ShortifyError::extraction("tool crashed")));
        let relay = DocumentRelay::new(extractor.clone());

        let doc = relay.convert(b"not a pdf").await.unwrap();
        assert!(doc.contains(PLACEHOLDER_TEXT));

        let (path, _) = extractor.seen.lock().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_convert_without_tool_uses_placeholder() {
        let relay = DocumentRelay::new(Arc::new(UnavailableExtractor));
        let doc = relay.convert(b"%PDF-1.4").await.unwrap();
        assert_eq!(doc, render_document(PLACEHOLDER_TEXT));
    }
}
