//! Chapter log pages.
//!
//! A chapter log carries a header line (pages, point of view, location),
//! three groups of category checkboxes, a two-row tension scale and two
//! columns of write spaces. Every field name is prefixed with `ch<n>` taken
//! from the page's own `CHAPTER <n>` heading.

use super::rules::{
    WriteSpace, CHAPTER_CHECK_GROUPS, CHAPTER_HEADER_BAND, CHAPTER_HEADER_FIELDS,
    CHAPTER_TENSION, CHAPTER_WRITE_SPACES, COLUMN_GUTTER, MIN_WRITE_SPACE_HEIGHT,
};
use super::{place_check_group, PageContext, Placements, TemplateHandler};
use crate::detect::page_chapter;
use crate::model::{FieldPlacement, Rect};

/// Places the fixed catalog of chapter log fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChapterLogHandler;

impl ChapterLogHandler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self
    }

    fn place_header(&self, ctx: &PageContext<'_>, prefix: &str, out: &mut Placements) {
        let Some(band) = ctx.anchors.resolve(CHAPTER_HEADER_BAND) else {
            return;
        };
        let gap = ctx.geometry.label_gap;

        for entry in CHAPTER_HEADER_FIELDS {
            let Some(label) = ctx.anchors.find_first_in(entry.label, band, None) else {
                log::debug!("{}_{}: label '{}' not found", prefix, entry.field, entry.label.text);
                continue;
            };

            let mut x1 = ctx.right_edge();
            if let Some(next) = ctx.anchors.next_on_line(label) {
                x1 = x1.min(next.bbox.x0 - gap);
            }

            let x0 = label.bbox.x1 + gap;
            if x1 <= x0 {
                log::debug!("{}_{}: no room right of label", prefix, entry.field);
                continue;
            }
            let rect = Rect::new(x0, label.bbox.y0, x1, label.bbox.y1);
            out.push(FieldPlacement::text(format!("{}_{}", prefix, entry.field), rect));
        }
    }

    fn place_tension(&self, ctx: &PageContext<'_>, prefix: &str, out: &mut Placements) {
        let scale = CHAPTER_TENSION;
        let Some((y0, y1)) = ctx.anchors.resolve(scale.band) else {
            return;
        };

        for span in ctx.anchors.spans() {
            if span.bbox.y0 < y0 || span.bbox.y0 > y1 || span.font_size >= scale.max_font {
                continue;
            }
            let Ok(digit) = span.trimmed().parse::<u32>() else {
                continue;
            };
            if !(1..=10).contains(&digit) {
                continue;
            }

            let row = if span.bbox.y0 < scale.cutoff {
                scale.upper_row
            } else {
                scale.lower_row
            };
            let (cx, cy) = span.bbox.center();
            out.push(FieldPlacement::checkbox(
                format!("{}_tension_{}_{}", prefix, row, digit),
                Rect::centered(cx, cy, scale.checkbox_size),
            ));
        }
    }

    /// Evaluate one write-space descriptor.
    ///
    /// Both anchors are searched in the descriptor's own column; a missing
    /// anchor means no field.
    fn write_space_rect(&self, ctx: &PageContext<'_>, space: &WriteSpace) -> Option<Rect> {
        let column = ctx.column(space.side, COLUMN_GUTTER);
        let top = ctx.anchors.nearest_below(space.top, 0.0, Some(column))?;

        let bottom = match space.bottom {
            Some(query) => ctx.anchors.nearest_below(query, top.bbox.y1, Some(column))?.bbox.y0,
            None => ctx.bottom_edge(),
        };

        let rect = Rect::new(column.x0, top.bbox.y1, column.x1, bottom);
        if bottom < top.bbox.y1 || rect.height() < MIN_WRITE_SPACE_HEIGHT {
            log::debug!(
                "{}: write space too short ({:.1}pt)",
                space.name,
                bottom - top.bbox.y1
            );
            return None;
        }
        Some(rect)
    }

    fn place_write_spaces(&self, ctx: &PageContext<'_>, prefix: &str, out: &mut Placements) {
        for space in CHAPTER_WRITE_SPACES {
            match self.write_space_rect(ctx, space) {
                Some(rect) => {
                    out.push(FieldPlacement::textarea(
                        format!("{}_{}", prefix, space.name),
                        rect,
                    ));
                }
                None => log::debug!("{}_{}: skipped", prefix, space.name),
            }
        }
    }
}

impl TemplateHandler for ChapterLogHandler {
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        let chapter = page_chapter(&ctx.page.spans).unwrap_or(0);
        let prefix = format!("ch{}", chapter);

        self.place_header(ctx, &prefix, out);

        let group_prefix = format!("{}_", prefix);
        for group in CHAPTER_CHECK_GROUPS {
            place_check_group(ctx, group, &group_prefix, out);
        }

        self.place_tension(ctx, &prefix, out);
        self.place_write_spaces(ctx, &prefix, out);

        log::debug!("{}: {} fields", prefix, out.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PageGeometry;
    use crate::model::{FieldKind, PageLayout};

    fn run(page: &PageLayout) -> Vec<FieldPlacement> {
        let ctx = PageContext::new(page, PageGeometry::default(), 0.5);
        let mut out = Placements::new();
        ChapterLogHandler::new().place(&ctx, &mut out);
        out.into_vec()
    }

    fn find<'a>(fields: &'a [FieldPlacement], name: &str) -> Option<&'a FieldPlacement> {
        fields.iter().find(|f| f.name == name)
    }

    fn chapter_page() -> PageLayout {
        PageLayout::a4(5)
            .with_span("CHAPTER 3", Rect::new(50.0, 40.0, 150.0, 58.0), 16.0)
            .with_span("Pages:", Rect::new(50.0, 70.0, 80.0, 80.0), 10.0)
            .with_span("________", Rect::new(84.0, 70.0, 150.0, 80.0), 10.0)
            .with_span("POV:", Rect::new(200.0, 70.0, 222.0, 80.0), 10.0)
            .with_span("Location:", Rect::new(350.0, 70.0, 395.0, 80.0), 10.0)
            .with_span("Arc Driver:", Rect::new(50.0, 92.0, 105.0, 102.0), 10.0)
            .with_span("Fantasy", Rect::new(130.0, 92.0, 165.0, 102.0), 10.0)
            .with_span("Romance", Rect::new(190.0, 92.0, 230.0, 102.0), 10.0)
            .with_span("Both Intertwined", Rect::new(255.0, 92.0, 330.0, 102.0), 10.0)
            .with_span("1", Rect::new(150.0, 140.0, 155.0, 148.0), 8.0)
            .with_span("10", Rect::new(300.0, 140.0, 310.0, 148.0), 8.0)
            .with_span("1", Rect::new(150.0, 175.0, 155.0, 183.0), 8.0)
            .with_span("This chapter's job", Rect::new(50.0, 198.0, 150.0, 210.0), 11.0)
            .with_span("One-Sentence Summary", Rect::new(50.0, 295.0, 170.0, 307.0), 11.0)
            .with_span("Opening Hook", Rect::new(320.0, 198.0, 400.0, 210.0), 11.0)
            .with_span("Closing Hook", Rect::new(320.0, 300.0, 400.0, 312.0), 11.0)
            .with_span("Beat Types", Rect::new(320.0, 420.0, 390.0, 432.0), 11.0)
            .with_span("Romance", Rect::new(340.0, 440.0, 380.0, 450.0), 10.0)
            .with_span("Plot", Rect::new(420.0, 440.0, 440.0, 450.0), 10.0)
    }

    #[test]
    fn test_job_write_space() {
        let fields = run(&chapter_page());
        let job = find(&fields, "ch3_job").expect("job field");
        assert_eq!(job.kind, FieldKind::MultiLineText);
        assert_eq!(job.rect.y0, 210.0);
        assert_eq!(job.rect.y1, 295.0);
        assert_eq!(job.rect.x0, 45.0);
    }

    #[test]
    fn test_job_needs_bottom_anchor() {
        let mut page = chapter_page();
        page.spans.retain(|s| s.text != "One-Sentence Summary");
        let fields = run(&page);
        assert!(find(&fields, "ch3_job").is_none());
        assert!(find(&fields, "ch3_summary").is_none());
    }

    fn with_summary_at(y0: f32) -> PageLayout {
        let mut page = chapter_page();
        for span in page.spans.iter_mut().filter(|s| s.text == "One-Sentence Summary") {
            span.bbox = Rect::new(50.0, y0, 170.0, y0 + 12.0);
        }
        page
    }

    #[test]
    fn test_short_write_space_is_dropped() {
        // 15pt between the anchors
        let fields = run(&with_summary_at(225.0));
        assert!(find(&fields, "ch3_job").is_none());
        assert!(find(&fields, "ch3_opening_hook").is_some());

        // Exactly the minimum height is kept
        let fields = run(&with_summary_at(230.0));
        let job = find(&fields, "ch3_job").expect("job field");
        assert_eq!(job.rect.height(), 20.0);
    }

    #[test]
    fn test_columns_keep_their_own_chains() {
        let fields = run(&chapter_page());
        let opening = find(&fields, "ch3_opening_hook").expect("opening hook");
        assert_eq!(opening.rect.y0, 210.0);
        assert_eq!(opening.rect.y1, 300.0);
        assert!(opening.rect.x0 > 290.0);

        let closing = find(&fields, "ch3_closing_hook").expect("closing hook");
        assert_eq!(closing.rect.y1, 420.0);
    }

    #[test]
    fn test_header_fields_clip_to_next_label() {
        let fields = run(&chapter_page());
        let pages = find(&fields, "ch3_pages").unwrap();
        assert_eq!(pages.rect, Rect::new(84.0, 70.0, 196.0, 80.0));

        let location = find(&fields, "ch3_location").unwrap();
        assert_eq!(location.rect.x1, 535.0);
    }

    #[test]
    fn test_category_checkboxes() {
        let fields = run(&chapter_page());
        let fantasy = find(&fields, "ch3_arc_fantasy").unwrap();
        assert_eq!(fantasy.kind, FieldKind::Checkbox);
        assert!(fantasy.rect.x1 <= 130.0);
        assert!(find(&fields, "ch3_arc_romance").is_some());
        assert!(find(&fields, "ch3_arc_both").is_some());

        // Beat types only come from the right column below their heading
        let beat = find(&fields, "ch3_beat_romance").unwrap();
        assert_eq!(beat.rect.y0, 440.0);
        assert!(find(&fields, "ch3_beat_plot").is_some());
        assert!(find(&fields, "ch3_tsrc_danger").is_none());
    }

    #[test]
    fn test_tension_rows() {
        let fields = run(&chapter_page());
        let r1 = find(&fields, "ch3_tension_romance_1").unwrap();
        assert_eq!(r1.rect.width(), 12.0);
        assert_eq!(r1.rect.center(), (152.5, 144.0));
        assert!(find(&fields, "ch3_tension_romance_10").is_some());
        assert!(find(&fields, "ch3_tension_plot_1").is_some());
    }

    #[test]
    fn test_tension_ignores_large_digits() {
        // Body text digits at 9pt and above are not scale labels
        let page = chapter_page()
            .with_span("5", Rect::new(200.0, 140.0, 205.0, 149.0), 9.0)
            .with_span("7", Rect::new(240.0, 175.0, 246.0, 186.0), 11.0)
            .with_span("4", Rect::new(180.0, 175.0, 185.0, 183.0), 8.5);
        let fields = run(&page);
        assert!(find(&fields, "ch3_tension_romance_5").is_none());
        assert!(find(&fields, "ch3_tension_plot_7").is_none());
        assert!(find(&fields, "ch3_tension_plot_4").is_some());
    }

    #[test]
    fn test_missing_heading_uses_chapter_zero() {
        let mut page = chapter_page();
        page.spans.retain(|s| s.text != "CHAPTER 3");
        let fields = run(&page);
        assert!(find(&fields, "ch0_job").is_some());
    }

    #[test]
    fn test_names_unique() {
        let fields = run(&chapter_page());
        let mut names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        names.sort();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
    }
}
