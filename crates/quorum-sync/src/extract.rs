//! Per-MIME-type text extraction with size capping.

use quorum_core::StorageBrowser;
use tracing::{debug, warn};

/// Document types the gateway can export as plain text.
const EXPORTABLE_MIMES: &[&str] = &[
    "application/pdf",
    "application/vnd.storage.document",
    "application/vnd.storage.spreadsheet",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "application/rtf",
    "application/vnd.oasis.opendocument.text",
];

/// Whether text can be pulled out of a file of this MIME type.
pub fn is_extractable(mime_type: &str) -> bool {
    mime_type.starts_with("text/") || EXPORTABLE_MIMES.contains(&mime_type)
}

/// Extract a file's text, capped at `max_chars`. Unsupported binary types
/// yield `None` without calling out; per-file export failures are logged and
/// also yield `None` so one bad file never aborts a crawl.
pub async fn extract_text(
    browser: &dyn StorageBrowser,
    file_id: &str,
    mime_type: &str,
    max_chars: usize,
) -> Option<String> {
    if !is_extractable(mime_type) {
        debug!("No text extraction for MIME type {}", mime_type);
        return None;
    }

    match browser.export_text(file_id, mime_type).await {
        Ok(text) => Some(truncate_chars(text, max_chars)),
        Err(e) => {
            warn!("Text extraction failed for {}: {}", file_id, e);
            None
        }
    }
}

/// Truncate a string to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeBrowser;

    #[tokio::test]
    async fn test_native_text_passes_through() {
        let mut browser = FakeBrowser::new();
        browser.add_file("root", "f1", "notes.txt", "text/plain", Some("hello world"));

        let text = extract_text(&browser, "f1", "text/plain", 100).await;
        assert_eq!(text.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_unsupported_mime_yields_none() {
        let browser = FakeBrowser::new();
        let text = extract_text(&browser, "f1", "image/png", 100).await;
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_export_failure_swallowed() {
        let mut browser = FakeBrowser::new();
        browser.add_file("root", "f1", "broken.pdf", "application/pdf", Some("x"));
        browser.fail_export("f1");

        let text = extract_text(&browser, "f1", "application/pdf", 100).await;
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_output_is_capped() {
        let mut browser = FakeBrowser::new();
        let long = "a".repeat(500);
        browser.add_file("root", "f1", "big.txt", "text/plain", Some(&long));

        let text = extract_text(&browser, "f1", "text/plain", 100).await.unwrap();
        assert_eq!(text.chars().count(), 100);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "héllo wörld".to_string();
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated, "héll");
    }
}
