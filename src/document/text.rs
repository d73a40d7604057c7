//! Plain-text document source, mainly for --text input and tests.

use crate::error::{ReadaloudError, Result};
use std::path::Path;

use super::DocumentSource;

/// Plain text treated as a document. Form feeds (`\x0c`) act as page
/// breaks; text without any is a single page.
pub struct TextDocument {
    name: String,
    pages: Vec<String>,
}

impl TextDocument {
    pub fn from_string(name: impl Into<String>, text: &str) -> Self {
        let mut pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
        if pages.is_empty() {
            pages.push(String::new());
        }
        Self {
            name: name.into(),
            pages,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReadaloudError::Document {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_string(name, &text))
    }
}

impl DocumentSource for TextDocument {
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
