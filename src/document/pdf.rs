//! PDF-backed document source.

use crate::error::{ReadaloudError, Result};
use std::path::Path;

use super::DocumentSource;

/// A PDF file with its text extracted up front, page by page.
///
/// Extraction happens once at open time; page lookups afterwards are
/// infallible apart from range checks.
pub struct PdfDocument {
    name: String,
    pages: Vec<String>,
}

impl PdfDocument {
    /// Opens `path` and extracts the text of every page.
    pub fn open(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| {
            ReadaloudError::Document {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        if pages.is_empty() {
            return Err(ReadaloudError::Document {
                path: path.display().to_string(),
                message: "document contains no pages".to_string(),
            });
        }

        Ok(Self { name, pages })
    }
}

impl DocumentSource for PdfDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String> {
        if page == 0 || page > self.pages.len() {
            return Err(ReadaloudError::PageOutOfRange {
                page,
                total: self.pages.len(),
            });
        }
        Ok(self.pages[page - 1].clone())
    }
}
