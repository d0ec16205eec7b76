//! # flatform
//!
//! Turns a flat, printable worksheet PDF into a fillable form.
//!
//! The library never touches PDF bytes itself. It consumes the text layout
//! of each page (spans with bounding boxes and font sizes, as produced by an
//! external extractor), recognizes which worksheet template the page follows
//! and decides where checkboxes and text fields belong. The result is a
//! placement report that a materializer turns into an outline preview or a
//! plan of real widgets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatform::{load_layout, process_document, render, JsonFormat};
//!
//! fn main() -> flatform::Result<()> {
//!     let layout = load_layout("guide.layout.json")?;
//!     let report = process_document(&layout);
//!
//!     println!("{}", render::to_text(&report)?);
//!     std::fs::write("report.json", render::to_json(&report, JsonFormat::Pretty)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Template detection**: chapter logs, book metadata, question pages, tables
//! - **Anchor-relative placement**: fields follow the printed labels, not fixed coordinates
//! - **Table inference**: columns and rows from header text and row labels
//! - **Preview and commit**: outline overlays or styled widget plans
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod detect;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use detect::classify_page;
pub use engine::{EngineOptions, FieldEngine, PageGeometry};
pub use error::{Error, Result};
pub use model::{
    DocumentLayout, FieldKind, FieldPlacement, PageLayout, PageTemplate, Rect, TextSpan,
};
pub use render::{
    DocumentReport, FieldMaterializer, JsonFormat, MaterializeMode, PageReport, PageSelection,
    Plan, PreviewOverlay, Stroke, Widget, WidgetPlan,
};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Load a layout file from disk.
///
/// # Arguments
///
/// * `path` - Path to the layout JSON file
///
/// # Errors
///
/// `Error::InputNotFound` when the path does not exist, `Error::InvalidLayout`
/// when the file is not a valid layout.
///
/// # Example
///
/// ```no_run
/// use flatform::load_layout;
///
/// let layout = load_layout("guide.layout.json").unwrap();
/// println!("Pages: {}", layout.page_count());
/// ```
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<DocumentLayout> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let layout = DocumentLayout::from_reader(BufReader::new(file))?;
    log::debug!("loaded {} pages from {}", layout.page_count(), path.display());
    Ok(layout)
}

/// Place fields on a single page with default options.
///
/// # Example
///
/// ```
/// use flatform::{place_fields, FieldKind, PageLayout, Rect};
///
/// let page = PageLayout::a4(1)
///     .with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0)
///     .with_span("PRESENT?", Rect::new(300.0, 40.0, 340.0, 48.0), 8.0)
///     .with_span("Slow Burn", Rect::new(50.0, 60.0, 98.0, 70.0), 10.0);
///
/// let fields = place_fields(&page);
/// assert_eq!(fields.len(), 1);
/// assert_eq!(fields[0].kind, FieldKind::Checkbox);
/// ```
pub fn place_fields(page: &PageLayout) -> Vec<FieldPlacement> {
    FieldEngine::new().process_page(page).fields
}

/// Place fields on every page of a layout with default options.
pub fn process_document(layout: &DocumentLayout) -> DocumentReport {
    FieldEngine::new().process_document(layout)
}

/// Output path derived from the input: stem, mode suffix, original extension.
///
/// # Example
///
/// ```
/// use flatform::{default_output_path, MaterializeMode};
/// use std::path::PathBuf;
///
/// let out = default_output_path("books/guide.pdf", MaterializeMode::Preview);
/// assert_eq!(out, PathBuf::from("books/guide-preview.pdf"));
/// ```
pub fn default_output_path<P: AsRef<Path>>(input: P, mode: MaterializeMode) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{}{}", stem, mode.output_suffix());
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}

/// Builder for running the placement engine over a layout file.
///
/// # Example
///
/// ```no_run
/// use flatform::{Flatform, JsonFormat};
///
/// let json = Flatform::new()
///     .preview()
///     .with_shape_fallback(true)
///     .process("guide.layout.json")?
///     .plan_json(JsonFormat::Pretty)?;
/// # Ok::<(), flatform::Error>(())
/// ```
pub struct Flatform {
    options: EngineOptions,
    mode: MaterializeMode,
}

impl Flatform {
    /// Create a new Flatform builder.
    pub fn new() -> Self {
        Self {
            options: EngineOptions::default(),
            mode: MaterializeMode::default(),
        }
    }

    /// Replace all engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Process pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Enable or disable the drawn-shape fallback detector.
    pub fn with_shape_fallback(mut self, enabled: bool) -> Self {
        self.options = self.options.with_shape_fallback(enabled);
        self
    }

    /// Set the materialization mode.
    pub fn with_mode(mut self, mode: MaterializeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Outline placements instead of creating widgets.
    pub fn preview(self) -> Self {
        self.with_mode(MaterializeMode::Preview)
    }

    /// Load a layout file and place fields on it.
    pub fn process<P: AsRef<Path>>(self, path: P) -> Result<FlatformResult> {
        let layout = load_layout(path)?;
        Ok(self.process_layout(&layout))
    }

    /// Place fields on an already loaded layout.
    pub fn process_layout(self, layout: &DocumentLayout) -> FlatformResult {
        let engine = FieldEngine::with_options(self.options);
        let report = engine.process_document(layout);
        FlatformResult {
            report,
            engine,
            mode: self.mode,
        }
    }
}

impl Default for Flatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a placement run.
pub struct FlatformResult {
    /// Placement report
    pub report: DocumentReport,
    engine: FieldEngine,
    mode: MaterializeMode,
}

impl FlatformResult {
    /// Materialization mode chosen on the builder.
    pub fn mode(&self) -> MaterializeMode {
        self.mode
    }

    /// Get the placement report.
    pub fn report(&self) -> &DocumentReport {
        &self.report
    }

    /// Report as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.report, format)
    }

    /// Report as a text summary.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.report)
    }

    /// Outline overlay of every placement.
    pub fn preview_plan(&self) -> Result<Plan<Stroke>> {
        let mut overlay = PreviewOverlay::new();
        self.engine.materialize(&self.report, &mut overlay)?;
        Ok(overlay.into_plan())
    }

    /// Styled widgets for every placement.
    pub fn widget_plan(&self) -> Result<Plan<Widget>> {
        let mut widgets = WidgetPlan::new();
        self.engine.materialize(&self.report, &mut widgets)?;
        Ok(widgets.into_plan())
    }

    /// Plan for the builder's mode, as JSON.
    pub fn plan_json(&self, format: JsonFormat) -> Result<String> {
        match self.mode {
            MaterializeMode::Preview => render::to_json(&self.preview_plan()?, format),
            MaterializeMode::Commit => render::to_json(&self.widget_plan()?, format),
        }
    }
}
