//! Field materializers.
//!
//! A materializer turns a [`DocumentReport`] into something a PDF writer can
//! apply: an outline overlay for previewing placements, or a plan of real
//! widgets. Both collect into a serialisable [`Plan`].
//!
//! # Example
//!
//! ```
//! use flatform::render::{DocumentReport, FieldMaterializer, PageReport, PreviewOverlay};
//! use flatform::{FieldPlacement, PageTemplate, Rect};
//!
//! let mut report = DocumentReport::new(None);
//! let field = FieldPlacement::checkbox("heat_3", Rect::new(50.0, 60.0, 60.0, 70.0));
//! report.add_page(PageReport::new(1, (595.0, 842.0), PageTemplate::BookMetadata, vec![field]));
//!
//! let mut overlay = PreviewOverlay::new();
//! overlay.begin_document(&report).unwrap();
//! for page in &report.pages {
//!     overlay.begin_page(page).unwrap();
//!     for field in &page.fields {
//!         overlay.place(page, field).unwrap();
//!     }
//!     overlay.end_page(page).unwrap();
//! }
//! assert_eq!(overlay.into_plan().item_count(), 1);
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocumentReport, MaterializeMode, PageReport};
use crate::error::{Error, Result};
use crate::model::{FieldKind, FieldPlacement, Rect};

/// Largest checkbox side in points.
pub const MAX_CHECKBOX_SIDE: f32 = 14.0;

/// Inset applied to single-line text widgets.
pub const TEXT_INSET: f32 = 2.0;

/// Font size of single-line text widgets.
pub const TEXT_FONT_SIZE: f32 = 10.0;

/// RGB colour with components in `0.0..=1.0`.
pub type Rgb = [f32; 3];

const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Sink for placements, driven page by page.
///
/// Only [`FieldEngine::materialize`](crate::engine::FieldEngine::materialize)
/// calls these; inference never does.
pub trait FieldMaterializer {
    /// Called once before the first page.
    fn begin_document(&mut self, report: &DocumentReport) -> Result<()> {
        let _ = report;
        Ok(())
    }

    /// Called before the placements of a page.
    fn begin_page(&mut self, page: &PageReport) -> Result<()> {
        let _ = page;
        Ok(())
    }

    /// Called once per placement, in handler order.
    fn place(&mut self, page: &PageReport, field: &FieldPlacement) -> Result<()>;

    /// Called after the placements of a page.
    fn end_page(&mut self, page: &PageReport) -> Result<()> {
        let _ = page;
        Ok(())
    }
}

/// Items collected for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPage<T> {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Items in placement order
    pub items: Vec<T>,
}

/// Output of a materializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan<T> {
    /// Materialization mode
    pub mode: MaterializeMode,
    /// Source document
    pub source: Option<String>,
    /// When the plan was produced
    pub generated_at: DateTime<Utc>,
    /// Pages that received a `begin_page` call
    pub pages: Vec<PlanPage<T>>,
}

impl<T> Plan<T> {
    fn new(mode: MaterializeMode) -> Self {
        Self {
            mode,
            source: None,
            generated_at: Utc::now(),
            pages: Vec::new(),
        }
    }

    /// Total number of items.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// Iterate over every item with its page number.
    pub fn items(&self) -> impl Iterator<Item = (u32, &T)> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter().map(move |i| (p.number, i)))
    }

    fn start_page(&mut self, page: &PageReport) {
        self.pages.push(PlanPage {
            number: page.number,
            width: page.width,
            height: page.height,
            items: Vec::new(),
        });
    }

    fn push(&mut self, page: &PageReport, item: T) -> Result<()> {
        match self.pages.last_mut() {
            Some(current) if current.number == page.number => {
                current.items.push(item);
                Ok(())
            }
            _ => Err(Error::Materialize(format!(
                "placement on page {} outside begin_page/end_page",
                page.number
            ))),
        }
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Outline drawn around one placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Placement name
    pub name: String,
    /// Placement kind
    pub kind: FieldKind,
    /// Rectangle in page space
    pub rect: Rect,
    /// Rectangle in PDF user space as `[x0, y0, x1, y1]`
    pub pdf_rect: [f32; 4],
    /// Stroke colour
    pub color: Rgb,
    /// Stroke width in points
    pub width: f32,
}

/// Outline colour for a field kind.
pub fn stroke_color(kind: FieldKind) -> Rgb {
    match kind {
        FieldKind::Checkbox => [0.0, 0.4, 1.0],
        FieldKind::SingleLineText => [0.0, 0.7, 0.2],
        FieldKind::MultiLineText => [1.0, 0.5, 0.0],
    }
}

/// Preview mode: one outline per placement, no interactivity.
#[derive(Debug, Clone)]
pub struct PreviewOverlay {
    plan: Plan<Stroke>,
}

impl PreviewOverlay {
    /// Create a new empty overlay.
    pub fn new() -> Self {
        Self {
            plan: Plan::new(MaterializeMode::Preview),
        }
    }

    /// Collected strokes.
    pub fn plan(&self) -> &Plan<Stroke> {
        &self.plan
    }

    /// Consume the overlay and return its plan.
    pub fn into_plan(self) -> Plan<Stroke> {
        self.plan
    }
}

impl Default for PreviewOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMaterializer for PreviewOverlay {
    fn begin_document(&mut self, report: &DocumentReport) -> Result<()> {
        self.plan.source = report.source.clone();
        Ok(())
    }

    fn begin_page(&mut self, page: &PageReport) -> Result<()> {
        self.plan.start_page(page);
        Ok(())
    }

    fn place(&mut self, page: &PageReport, field: &FieldPlacement) -> Result<()> {
        let stroke = Stroke {
            name: field.name.clone(),
            kind: field.kind,
            rect: field.rect,
            pdf_rect: field.rect.to_pdf_space(page.height),
            color: stroke_color(field.kind),
            width: 1.0,
        };
        self.plan.push(page, stroke)
    }
}

// ============================================================================
// Commit
// ============================================================================

/// Appearance of one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetStyle {
    /// Border width in points
    pub border_width: f32,
    /// Background colour
    pub background: Option<Rgb>,
    /// Font size for text widgets
    pub font_size: Option<f32>,
    /// Whether text wraps over several lines
    pub multiline: bool,
}

impl WidgetStyle {
    /// Style for a field kind with the given (final) widget rectangle.
    pub fn for_kind(kind: FieldKind, rect: &Rect) -> Self {
        match kind {
            FieldKind::Checkbox => Self {
                border_width: 1.0,
                background: Some(WHITE),
                font_size: None,
                multiline: false,
            },
            FieldKind::SingleLineText => Self {
                border_width: 0.0,
                background: Some(WHITE),
                font_size: Some(TEXT_FONT_SIZE),
                multiline: false,
            },
            FieldKind::MultiLineText => Self {
                border_width: 0.0,
                background: Some(WHITE),
                font_size: Some(textarea_font_size(rect.height())),
                multiline: true,
            },
        }
    }
}

/// Font size of a multi-line widget of height `h`: `floor(h/8)` clamped to 8..=10.
pub fn textarea_font_size(h: f32) -> f32 {
    (h / 8.0).floor().max(8.0).min(10.0)
}

/// Final widget rectangle for a placement.
pub fn widget_rect(field: &FieldPlacement) -> Rect {
    match field.kind {
        FieldKind::Checkbox => {
            let side = field.rect.width().min(field.rect.height()).min(MAX_CHECKBOX_SIDE);
            let (cx, cy) = field.rect.center();
            Rect::centered(cx, cy, side)
        }
        FieldKind::SingleLineText => field.rect.inset(TEXT_INSET),
        FieldKind::MultiLineText => field.rect,
    }
}

/// One interactive widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Document-unique widget name
    pub name: String,
    /// Widget kind
    pub kind: FieldKind,
    /// Rectangle in page space
    pub rect: Rect,
    /// Rectangle in PDF user space as `[x0, y0, x1, y1]`
    pub pdf_rect: [f32; 4],
    /// Appearance
    pub style: WidgetStyle,
}

/// Commit mode: one styled widget per placement.
///
/// Placement names are unique per page only; a name seen on an earlier page
/// gets a `_p<page>` suffix.
#[derive(Debug, Clone)]
pub struct WidgetPlan {
    plan: Plan<Widget>,
    used: HashSet<String>,
}

impl WidgetPlan {
    /// Create a new empty widget plan.
    pub fn new() -> Self {
        Self {
            plan: Plan::new(MaterializeMode::Commit),
            used: HashSet::new(),
        }
    }

    /// Collected widgets.
    pub fn plan(&self) -> &Plan<Widget> {
        &self.plan
    }

    /// Consume the builder and return its plan.
    pub fn into_plan(self) -> Plan<Widget> {
        self.plan
    }

    fn unique_name(&mut self, name: &str, page: u32) -> String {
        if self.used.insert(name.to_string()) {
            return name.to_string();
        }

        let base = format!("{}_p{}", name, page);
        let mut candidate = base.clone();
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        log::debug!("renamed repeated field '{}' to '{}'", name, candidate);
        candidate
    }
}

impl Default for WidgetPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMaterializer for WidgetPlan {
    fn begin_document(&mut self, report: &DocumentReport) -> Result<()> {
        self.plan.source = report.source.clone();
        Ok(())
    }

    fn begin_page(&mut self, page: &PageReport) -> Result<()> {
        self.plan.start_page(page);
        Ok(())
    }

    fn place(&mut self, page: &PageReport, field: &FieldPlacement) -> Result<()> {
        let rect = widget_rect(field);
        let widget = Widget {
            name: self.unique_name(&field.name, page.number),
            kind: field.kind,
            rect,
            pdf_rect: rect.to_pdf_space(page.height),
            style: WidgetStyle::for_kind(field.kind, &rect),
        };
        self.plan.push(page, widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageTemplate;

    fn page(number: u32, fields: Vec<FieldPlacement>) -> PageReport {
        PageReport::new(number, (612.0, 792.0), PageTemplate::Table, fields)
    }

    fn drive<M: FieldMaterializer>(m: &mut M, pages: &[PageReport]) {
        for p in pages {
            m.begin_page(p).unwrap();
            for f in &p.fields {
                m.place(p, f).unwrap();
            }
            m.end_page(p).unwrap();
        }
    }

    #[test]
    fn test_checkbox_clamped_and_centred() {
        let field = FieldPlacement::checkbox("c", Rect::new(100.0, 100.0, 130.0, 120.0));
        let rect = widget_rect(&field);
        assert_eq!(rect.width(), 14.0);
        assert_eq!(rect.center(), (115.0, 110.0));

        let small = FieldPlacement::checkbox("c", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(widget_rect(&small).width(), 10.0);
    }

    #[test]
    fn test_text_inset() {
        let field = FieldPlacement::text("t", Rect::new(84.0, 20.0, 535.0, 32.0));
        assert_eq!(widget_rect(&field), Rect::new(86.0, 22.0, 533.0, 30.0));
    }

    #[test]
    fn test_textarea_font_size() {
        assert_eq!(textarea_font_size(40.0), 8.0);
        assert_eq!(textarea_font_size(75.0), 9.0);
        assert_eq!(textarea_font_size(300.0), 10.0);
    }

    #[test]
    fn test_widget_names_unique_across_pages() {
        let r = Rect::new(0.0, 0.0, 12.0, 12.0);
        let pages = vec![
            page(1, vec![FieldPlacement::checkbox("table_r1_c2", r)]),
            page(2, vec![FieldPlacement::checkbox("table_r1_c2", r)]),
            page(3, vec![FieldPlacement::checkbox("table_r1_c2", r)]),
        ];
        let mut plan = WidgetPlan::new();
        drive(&mut plan, &pages);

        let names: Vec<&str> = plan.plan().items().map(|(_, w)| w.name.as_str()).collect();
        assert_eq!(names, vec!["table_r1_c2", "table_r1_c2_p2", "table_r1_c2_p3"]);
    }

    #[test]
    fn test_pdf_space_flip() {
        let field = FieldPlacement::textarea("a", Rect::new(45.0, 100.0, 300.0, 200.0));
        let mut plan = WidgetPlan::new();
        drive(&mut plan, &[page(1, vec![field])]);

        let widget = &plan.plan().pages[0].items[0];
        assert_eq!(widget.pdf_rect, [45.0, 592.0, 300.0, 692.0]);
        assert!(widget.style.multiline);
        assert_eq!(widget.style.background, Some(WHITE));
    }

    #[test]
    fn test_preview_strokes() {
        let r = Rect::new(0.0, 0.0, 20.0, 20.0);
        let fields = vec![FieldPlacement::checkbox("a", r), FieldPlacement::text("b", r)];
        let mut overlay = PreviewOverlay::new();
        drive(&mut overlay, &[page(1, fields)]);

        let plan = overlay.into_plan();
        assert_eq!(plan.mode, MaterializeMode::Preview);
        assert_eq!(plan.item_count(), 2);
        let stroke = &plan.pages[0].items[1];
        assert_eq!(stroke.width, 1.0);
        assert_eq!(stroke.color, stroke_color(FieldKind::SingleLineText));
        assert_eq!(stroke.rect, r);
    }

    #[test]
    fn test_place_without_page_fails() {
        let p = page(1, vec![]);
        let field = FieldPlacement::text("t", Rect::new(0.0, 0.0, 50.0, 12.0));
        let mut plan = WidgetPlan::new();
        assert!(matches!(plan.place(&p, &field), Err(Error::Materialize(_))));
    }
}
