//! Template handlers.
//!
//! Each handler turns the spans of one classified page into field
//! placements. Handlers never fail: a missing anchor or a degenerate
//! rectangle only means the dependent field is not emitted.

pub mod anchors;
pub mod chapter_log;
pub mod dedup;
pub mod metadata;
pub mod questions;
pub mod rules;
pub mod shapes;
pub mod table_detector;

use std::collections::HashSet;

use crate::engine::PageGeometry;
use crate::model::{FieldPlacement, PageLayout, Rect};

use anchors::{AnchorIndex, Column, Query};
use rules::{CheckGroup, ColumnSide, CHECKBOX_SIZE, COLUMN_GUTTER};

pub use chapter_log::ChapterLogHandler;
pub use metadata::MetadataHandler;
pub use questions::QuestionsHandler;
pub use shapes::ShapeDetector;
pub use table_detector::{TableDetector, TableSchema};

/// Placements narrower or shorter than this are dropped.
pub const MIN_FIELD_EXTENT: f32 = 2.0;

/// Everything a handler may consult about the page being processed.
pub struct PageContext<'a> {
    /// The page itself
    pub page: &'a PageLayout,
    /// Spans in reading order
    pub anchors: AnchorIndex<'a>,
    /// Margins and bounds
    pub geometry: PageGeometry,
    /// Overlap threshold for dedup and emptiness probes
    pub overlap_threshold: f32,
}

impl<'a> PageContext<'a> {
    /// Create a new context for `page`.
    pub fn new(page: &'a PageLayout, geometry: PageGeometry, overlap_threshold: f32) -> Self {
        Self {
            page,
            anchors: AnchorIndex::new(&page.spans, page.height),
            geometry,
            overlap_threshold,
        }
    }

    /// Right edge of the text column.
    pub fn right_edge(&self) -> f32 {
        self.geometry.right_edge(self.page.width)
    }

    /// Page-bottom bound for fields that run to the end of the page.
    pub fn bottom_edge(&self) -> f32 {
        self.geometry.bottom_edge(self.page.height)
    }

    /// The full text column.
    pub fn text_column(&self) -> Column {
        Column::new(self.geometry.left_margin, self.right_edge())
    }

    /// One half of a two-column layout, or the full text column for `Any`.
    pub fn column(&self, side: ColumnSide, gutter: f32) -> Column {
        let mid = self.page.width / 2.0;
        match side {
            ColumnSide::Any => self.text_column(),
            ColumnSide::Left => Column::new(self.geometry.left_margin, mid - gutter / 2.0),
            ColumnSide::Right => Column::new(mid + gutter / 2.0, self.right_edge()),
        }
    }

    /// Column filter for anchor lookups; `Any` does not filter.
    pub fn column_filter(&self, side: ColumnSide) -> Option<Column> {
        match side {
            ColumnSide::Any => None,
            side => Some(self.column(side, COLUMN_GUTTER)),
        }
    }
}

/// Collects the placements of one page.
///
/// Rejects degenerate rectangles and repeated names so that every page's
/// output has unique names and usable geometry.
#[derive(Debug, Default)]
pub struct Placements {
    fields: Vec<FieldPlacement>,
    names: HashSet<String>,
}

impl Placements {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placement. Returns `false` when it was dropped.
    pub fn push(&mut self, placement: FieldPlacement) -> bool {
        if placement.rect.is_degenerate(MIN_FIELD_EXTENT) {
            log::debug!(
                "dropping {} '{}': degenerate rect {:?}",
                placement.kind,
                placement.name,
                placement.rect
            );
            return false;
        }
        if !self.names.insert(placement.name.clone()) {
            log::debug!("dropping {} '{}': duplicate name", placement.kind, placement.name);
            return false;
        }
        self.fields.push(placement);
        true
    }

    /// Number of placements collected so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the collection, keeping insertion order.
    pub fn into_vec(self) -> Vec<FieldPlacement> {
        self.fields
    }
}

/// A handler for one page template.
pub trait TemplateHandler {
    /// Append the page's placements to `out`.
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements);
}

/// Square checkbox immediately left of `label`, vertically centred on it.
pub(crate) fn checkbox_left_of(label: &Rect, size: f32, gap: f32) -> Rect {
    let (_, cy) = label.center();
    Rect::new(
        label.x0 - gap - size,
        cy - size / 2.0,
        label.x0 - gap,
        cy + size / 2.0,
    )
}

/// Place one checkbox left of each option label of `group` found in its band.
///
/// Names are `<name_prefix><group prefix>_<option slug>`. Returns the number
/// of checkboxes placed.
pub(crate) fn place_check_group(
    ctx: &PageContext<'_>,
    group: &CheckGroup,
    name_prefix: &str,
    out: &mut Placements,
) -> usize {
    let Some(band) = ctx.anchors.resolve(group.band) else {
        log::debug!("{}{}: band anchor not found", name_prefix, group.prefix);
        return 0;
    };
    let column = ctx.column_filter(group.side);

    let mut placed = 0;
    for option in group.options {
        let query = Query {
            text: option.label,
            mode: group.mode,
        };
        let name = format!("{}{}_{}", name_prefix, group.prefix, option.slug);
        match ctx.anchors.find_first_in(query, band, column) {
            Some(label) => {
                let rect = checkbox_left_of(&label.bbox, CHECKBOX_SIZE, ctx.geometry.label_gap);
                if out.push(FieldPlacement::checkbox(name, rect)) {
                    placed += 1;
                }
            }
            None => log::debug!("{}: option label '{}' not found", name, option.label),
        }
    }
    placed
}

/// Field name fragment derived from label text.
///
/// Lower-cases, drops colons, turns spaces and slashes into `_` and drops
/// any other punctuation.
pub(crate) fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.trim().chars() {
        match c {
            ' ' | '/' => {
                if !slug.ends_with('_') && !slug.is_empty() {
                    slug.push('_');
                }
            }
            c if c.is_alphanumeric() => slug.extend(c.to_lowercase()),
            _ => {}
        }
    }
    slug.trim_end_matches('_').to_string()
}
