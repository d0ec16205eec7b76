//! Fields from drawn rectangles.
//!
//! Fallback for pages no template recognizes: blank boxes drawn on the page
//! are taken at face value and sized into checkboxes or text fields.

use super::dedup::dedup_by;
use super::rules::ShapeConfig;
use super::{PageContext, Placements, TemplateHandler};
use crate::model::{FieldKind, FieldPlacement, Rect};

/// Turns empty drawn boxes into fields.
#[derive(Debug, Default, Clone)]
pub struct ShapeDetector {
    config: ShapeConfig,
}

impl ShapeDetector {
    /// Create a new shape detector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new shape detector with custom thresholds.
    pub fn with_config(config: ShapeConfig) -> Self {
        Self { config }
    }

    /// Whether a box frames the whole page, reaching into every edge margin.
    pub fn is_page_border(&self, rect: &Rect, (width, height): (f32, f32)) -> bool {
        let m = self.config.page_edge_margin;
        rect.x0 < m && rect.y0 < m && rect.x1 > width - m && rect.y1 > height - m
    }

    /// Field kind suggested by a box's size on a page of the given size, if any.
    pub fn classify(&self, rect: &Rect, (_, page_height): (f32, f32)) -> Option<FieldKind> {
        let cfg = &self.config;
        let (w, h) = (rect.width(), rect.height());

        let squarish = (w - h).abs() <= cfg.checkbox_aspect_slack;
        let in_range = |v: f32| v >= cfg.checkbox_min && v <= cfg.checkbox_max;
        if squarish && in_range(w) && in_range(h) {
            return Some(FieldKind::Checkbox);
        }

        if w >= cfg.text_min_width && h < page_height * cfg.text_max_height_ratio {
            if h <= cfg.single_line_max_height {
                return Some(FieldKind::SingleLineText);
            }
            return Some(FieldKind::MultiLineText);
        }

        None
    }
}

impl TemplateHandler for ShapeDetector {
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        let cfg = &self.config;
        let size = ctx.page.dimensions();

        let mut checkboxes = Vec::new();
        let mut text = Vec::new();
        for (order, shape) in ctx.page.shapes.iter().enumerate() {
            if shape.is_degenerate(cfg.min_extent) || self.is_page_border(shape, size) {
                continue;
            }
            let probe = shape.expand(cfg.occupied_tolerance);
            if ctx
                .anchors
                .occupied(&probe, cfg.occupied_min_font, ctx.overlap_threshold)
            {
                continue;
            }
            match self.classify(shape, size) {
                Some(FieldKind::Checkbox) => checkboxes.push((order, FieldKind::Checkbox, *shape)),
                Some(kind) => text.push((order, kind, *shape)),
                None => {}
            }
        }

        // Checkboxes drawn inside larger boxes survive; only like kinds collide
        let mut kept = dedup_by(checkboxes, ctx.overlap_threshold, |c| c.2);
        kept.extend(dedup_by(text, ctx.overlap_threshold, |t| t.2));
        kept.sort_by_key(|(order, _, _)| *order);
        log::debug!(
            "shape detector: {} of {} boxes kept",
            kept.len(),
            ctx.page.shapes.len()
        );

        for (index, (_, kind, rect)) in kept.into_iter().enumerate() {
            out.push(FieldPlacement::new(kind, format!("box_{}", index + 1), rect));
        }
    }
}
