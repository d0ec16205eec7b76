//! Engine options and page geometry configuration.

use crate::render::PageSelection;

/// Options for running the placement engine over a document.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to process)
    pub pages: PageSelection,

    /// Run the drawn-shape detector on pages no template recognizes
    pub shape_fallback: bool,

    /// Overlap threshold τ for deduplication and emptiness probes
    pub overlap_threshold: f32,

    /// Margins and bounds shared by every handler
    pub geometry: PageGeometry,
}

impl EngineOptions {
    /// Create new engine options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process pages one after another.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable the drawn-shape fallback detector.
    pub fn with_shape_fallback(mut self, enabled: bool) -> Self {
        self.shape_fallback = enabled;
        self
    }

    /// Set the overlap threshold, clamped to `0.0..=1.0`.
    pub fn with_overlap_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            pages: PageSelection::All,
            shape_fallback: false,
            overlap_threshold: 0.5,
            geometry: PageGeometry::default(),
        }
    }
}

/// Margins and bounds of the printable text area, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Spans starting above this y belong to the running head
    pub top_margin: f32,

    /// Distance from the page bottom to the last usable y
    pub bottom_margin: f32,

    /// Left edge of the text column
    pub left_margin: f32,

    /// Distance from the page's right edge to the text column's right edge
    pub right_margin: f32,

    /// Horizontal gap between a label and the field placed beside it
    pub label_gap: f32,
}

impl PageGeometry {
    /// Right edge of the text column for a page of `page_width`.
    pub fn right_edge(&self, page_width: f32) -> f32 {
        page_width - self.right_margin
    }

    /// Last usable y for a page of `page_height`.
    pub fn bottom_edge(&self, page_height: f32) -> f32 {
        page_height - self.bottom_margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            top_margin: 30.0,
            bottom_margin: 50.0,
            left_margin: 45.0,
            right_margin: 60.0,
            label_gap: 4.0,
        }
    }
}
