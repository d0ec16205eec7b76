//! Field placements and page templates.

use super::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of interactive field to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A tickable box
    Checkbox,
    /// A one-line text input
    SingleLineText,
    /// A multi-line text area
    MultiLineText,
}

impl FieldKind {
    /// Short lowercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Checkbox => "checkbox",
            FieldKind::SingleLineText => "text",
            FieldKind::MultiLineText => "textarea",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a field goes and what it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    /// Field kind
    pub kind: FieldKind,
    /// Field name, unique within its page
    pub name: String,
    /// Field rectangle in page space
    pub rect: Rect,
}

impl FieldPlacement {
    /// Create a new placement.
    pub fn new(kind: FieldKind, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            kind,
            name: name.into(),
            rect,
        }
    }

    /// Create a checkbox placement.
    pub fn checkbox(name: impl Into<String>, rect: Rect) -> Self {
        Self::new(FieldKind::Checkbox, name, rect)
    }

    /// Create a single-line text placement.
    pub fn text(name: impl Into<String>, rect: Rect) -> Self {
        Self::new(FieldKind::SingleLineText, name, rect)
    }

    /// Create a multi-line text placement.
    pub fn textarea(name: impl Into<String>, rect: Rect) -> Self {
        Self::new(FieldKind::MultiLineText, name, rect)
    }
}

/// Recognized page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    /// Per-chapter reading log
    ChapterLog,
    /// Book metadata form (title, author, heat level, tropes)
    BookMetadata,
    /// Free-form question prompts
    WriteQuestions,
    /// Header-and-rows worksheet table
    Table,
    /// Recognized reference page that needs no fields
    ReferenceOnly,
    /// Not understood
    #[default]
    None,
}

impl PageTemplate {
    /// Short lowercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            PageTemplate::ChapterLog => "chapter_log",
            PageTemplate::BookMetadata => "book_metadata",
            PageTemplate::WriteQuestions => "write_questions",
            PageTemplate::Table => "table",
            PageTemplate::ReferenceOnly => "reference_only",
            PageTemplate::None => "none",
        }
    }
}

impl fmt::Display for PageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
