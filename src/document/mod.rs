//! Text sources for narration.
//!
//! A [`DocumentSource`] hands out per-page text; extraction quality is the
//! source's problem, emptiness is the caller's. Pages are numbered from 1.

mod pdf;
mod text;

pub use pdf::PdfDocument;
pub use text::TextDocument;

use crate::error::Result;

/// A paged text source.
pub trait DocumentSource {
    /// Display name, used in the fallback narration.
    fn name(&self) -> &str;

    fn page_count(&self) -> usize;

    /// Extracted text for `page` (1-based). May legitimately be empty,
    /// e.g. for scanned or image-only pages.
    fn page_text(&self, page: usize) -> Result<String>;
}

/// Spoken stand-in for a page that yielded no text, so the pipeline always
/// has non-empty input.
pub fn fallback_narration(page: usize, total: usize, name: &str) -> String {
    format!(
        "This is page {page} of {total} from the document \"{name}\". \
         Unfortunately, I could not extract any text content from this page. \
         This might be because the document contains images or scanned content."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_narration_mentions_page_and_name() {
        let narration = fallback_narration(3, 12, "paper.pdf");
        assert!(narration.contains("page 3 of 12"));
        assert!(narration.contains("\"paper.pdf\""));
        assert!(!narration.trim().is_empty());
    }
}
