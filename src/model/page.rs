//! Page-level layout types.

use super::{Rect, TextSpan};
use serde::{Deserialize, Serialize};

/// Extents below this (in points) mark a span or shape as degenerate at ingestion.
pub const MIN_INGEST_EXTENT: f32 = 0.5;

/// The extracted layout of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    #[serde(default)]
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text spans in extractor order
    #[serde(default)]
    pub spans: Vec<TextSpan>,

    /// Drawn rectangles (boxes, underlines, cell borders)
    #[serde(default)]
    pub shapes: Vec<Rect>,
}

impl PageLayout {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            spans: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// Add a text span to the page.
    pub fn add_span(&mut self, span: TextSpan) {
        self.spans.push(span);
    }

    /// Add a drawn shape to the page.
    pub fn add_shape(&mut self, shape: Rect) {
        self.shapes.push(shape);
    }

    /// Builder-style span insertion, handy for synthetic pages.
    pub fn with_span(mut self, text: &str, bbox: Rect, font_size: f32) -> Self {
        self.add_span(TextSpan::new(text, bbox, font_size, "Helvetica"));
        self
    }

    /// Drop degenerate spans and shapes and normalize span text.
    ///
    /// Returns the number of spans and shapes removed.
    pub fn sanitize(&mut self) -> (usize, usize) {
        let span_count = self.spans.len();
        let shape_count = self.shapes.len();

        for span in &mut self.spans {
            span.bbox = Rect::new(span.bbox.x0, span.bbox.y0, span.bbox.x1, span.bbox.y1);
            span.normalize();
        }
        self.spans
            .retain(|s| !s.text.is_empty() && !s.bbox.is_degenerate(MIN_INGEST_EXTENT));

        self.shapes = self
            .shapes
            .iter()
            .map(|r| Rect::new(r.x0, r.y0, r.x1, r.y1))
            .filter(|r| !r.is_degenerate(MIN_INGEST_EXTENT))
            .collect();

        (
            span_count - self.spans.len(),
            shape_count - self.shapes.len(),
        )
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::letter(1)
    }
}
