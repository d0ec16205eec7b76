//! Placement results with per-page and per-document statistics.

use crate::model::{FieldKind, FieldPlacement, PageTemplate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of fields by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCounts {
    /// Checkboxes
    pub checkbox: u32,
    /// Single-line text fields
    pub text: u32,
    /// Multi-line text fields
    pub textarea: u32,
}

impl FieldCounts {
    /// Create new empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the kinds of a placement list.
    pub fn from_fields(fields: &[FieldPlacement]) -> Self {
        let mut counts = Self::new();
        for field in fields {
            counts.add(field.kind);
        }
        counts
    }

    /// Increment the count for `kind`.
    pub fn add(&mut self, kind: FieldKind) {
        match kind {
            FieldKind::Checkbox => self.checkbox += 1,
            FieldKind::SingleLineText => self.text += 1,
            FieldKind::MultiLineText => self.textarea += 1,
        }
    }

    /// Count for `kind`.
    pub fn get(&self, kind: FieldKind) -> u32 {
        match kind {
            FieldKind::Checkbox => self.checkbox,
            FieldKind::SingleLineText => self.text,
            FieldKind::MultiLineText => self.textarea,
        }
    }

    /// Total number of fields.
    pub fn total(&self) -> u32 {
        self.checkbox + self.text + self.textarea
    }

    /// Merge another counts instance into this one.
    pub fn merge(&mut self, other: &FieldCounts) {
        self.checkbox += other.checkbox;
        self.text += other.text;
        self.textarea += other.textarea;
    }
}

/// Placements of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Detected template
    pub template: PageTemplate,

    /// Placements in handler order
    pub fields: Vec<FieldPlacement>,

    /// Field counts by kind
    pub counts: FieldCounts,
}

impl PageReport {
    /// Create a new page report; counts are derived from `fields`.
    pub fn new(
        number: u32,
        (width, height): (f32, f32),
        template: PageTemplate,
        fields: Vec<FieldPlacement>,
    ) -> Self {
        let counts = FieldCounts::from_fields(&fields);
        Self {
            number,
            width,
            height,
            template,
            fields,
            counts,
        }
    }

    /// Check if the page received no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Placements of a whole document plus running totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Source document, as recorded in the layout file
    pub source: Option<String>,

    /// When the report was produced
    pub generated_at: DateTime<Utc>,

    /// Processed pages in document order
    pub pages: Vec<PageReport>,

    /// Field counts over all pages
    pub totals: FieldCounts,

    /// Number of pages per detected template
    pub templates: BTreeMap<PageTemplate, u32>,
}

impl DocumentReport {
    /// Create a new empty report.
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            generated_at: Utc::now(),
            pages: Vec::new(),
            totals: FieldCounts::new(),
            templates: BTreeMap::new(),
        }
    }

    /// Append a page and fold its counts into the totals.
    pub fn add_page(&mut self, page: PageReport) {
        self.totals.merge(&page.counts);
        *self.templates.entry(page.template).or_insert(0) += 1;
        self.pages.push(page);
    }

    /// Number of processed pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Number of pages with the given template.
    pub fn template_count(&self, template: PageTemplate) -> u32 {
        self.templates.get(&template).copied().unwrap_or(0)
    }

    /// Total number of placements.
    pub fn field_count(&self) -> u32 {
        self.totals.total()
    }

    /// Iterate over every placement with its page number.
    pub fn placements(&self) -> impl Iterator<Item = (u32, &FieldPlacement)> {
        self.pages
            .iter()
            .flat_map(|p| p.fields.iter().map(move |f| (p.number, f)))
    }
}

impl Default for DocumentReport {
    fn default() -> Self {
        Self::new(None)
    }
}
