//! PDF text extraction

use crate::error::{AskRouteError, Result};
use std::fs;
use std::path::Path;

/// Extract per-page text from a PDF file.
///
/// Pages are recovered from the extractor's form-feed page breaks; a PDF
/// without breaks yields a single page. Blank pages are dropped.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(AskRouteError::SourceNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| {
        AskRouteError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read PDF file {:?}: {}", path, e),
        ))
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        AskRouteError::Parse(format!("Failed to extract text from PDF {:?}: {}", path, e))
    })?;

    if text.trim().is_empty() {
        return Err(AskRouteError::Parse(format!(
            "PDF file {:?} contains no extractable text (may be image-based)",
            path
        )));
    }

    let pages: Vec<String> = text
        .split('\u{000C}')
        .filter(|page| !page.trim().is_empty())
        .map(|page| page.to_string())
        .collect();

    Ok(pages)
}
