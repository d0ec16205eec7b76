//! Text spans as supplied by the layout extractor.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::Rect;

/// A run of text at a single font and size, with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Bounding box in page space
    pub bbox: Rect,
    /// Font size in points
    #[serde(alias = "size")]
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default, alias = "font")]
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, bbox: Rect, font_size: f32, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            font_name: font_name.into(),
        }
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Check whether the text is all upper case (ignoring non-letters).
    ///
    /// Text without any letters is not considered upper case.
    pub fn is_uppercase(&self) -> bool {
        let mut has_letter = false;
        for c in self.text.chars().filter(|c| c.is_alphabetic()) {
            has_letter = true;
            if c.is_lowercase() {
                return false;
            }
        }
        has_letter
    }

    /// Check whether the span only draws a rule (`____`, `– – –`) rather than text.
    pub fn is_rule(&self) -> bool {
        let trimmed = self.trimmed();
        !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_whitespace() || matches!(c, '_' | '-' | '–' | '—' | '.'))
    }

    /// Normalize text to NFKC, fold typographic apostrophes and collapse
    /// internal whitespace.
    ///
    /// Extractors frequently emit ligatures and non-breaking spaces; matching
    /// against the rule tables assumes plain text.
    pub(crate) fn normalize(&mut self) {
        let nfkc: String = self
            .text
            .nfkc()
            .map(|c| if matches!(c, '\u{2018}' | '\u{2019}') { '\'' } else { c })
            .collect();
        self.text = nfkc.split_whitespace().collect::<Vec<_>>().join(" ");
    }
}
