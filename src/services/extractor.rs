use std::path::Path;

use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("The file is not a valid PDF: {0}")]
    InvalidPdf(String),
    #[error("The PDF is encrypted and cannot be read")]
    Encrypted,
}

/// Extracts the text of every page of a PDF, concatenated in page order.
///
/// Extraction is best effort per page: a page whose content stream cannot be
/// decoded is skipped with a warning. An empty result is valid, since scanned
/// documents have no text layer.
pub fn extract_text_from_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;

    let doc = Document::load_mem(&bytes).map_err(|e| {
        let msg = e.to_string();
        let lowered = msg.to_lowercase();
        if lowered.contains("password") || lowered.contains("encrypt") || lowered.contains("decrypt")
        {
            ExtractError::Encrypted
        } else {
            ExtractError::InvalidPdf(msg)
        }
    })?;

    // Some encrypted documents still parse; the trailer gives them away
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(ExtractError::Encrypted);
    }

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    Ok(text)
}
