//! Document-level layout types.

use super::PageLayout;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// The extracted layout of a whole document, one entry per page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Path or name of the source document
    #[serde(default)]
    pub source: Option<String>,

    /// When the extractor produced this layout
    #[serde(default)]
    pub extracted_at: Option<DateTime<Utc>>,

    /// Pages in document order
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layout from JSON text and sanitize it.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut layout: DocumentLayout = serde_json::from_str(json)?;
        layout.sanitize()?;
        Ok(layout)
    }

    /// Parse a layout from a reader and sanitize it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut layout: DocumentLayout = serde_json::from_reader(reader)?;
        layout.sanitize()?;
        Ok(layout)
    }

    /// Number pages, drop degenerate geometry and validate page sizes.
    fn sanitize(&mut self) -> Result<()> {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            if page.number == 0 {
                page.number = idx as u32 + 1;
            }
            if !(page.width > 0.0 && page.height > 0.0) {
                return Err(Error::InvalidLayout(format!(
                    "page {} has non-positive size {}x{}",
                    page.number, page.width, page.height
                )));
            }

            let (spans, shapes) = page.sanitize();
            if spans > 0 || shapes > 0 {
                log::debug!(
                    "page {}: dropped {} degenerate spans and {} shapes",
                    page.number,
                    spans,
                    shapes
                );
            }
        }
        Ok(())
    }

    /// Get the number of pages in the layout.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageLayout> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Add a page to the layout.
    pub fn add_page(&mut self, page: PageLayout) {
        self.pages.push(page);
    }

    /// Check if the layout has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
