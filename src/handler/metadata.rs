//! Book metadata pages.

use super::rules::{HEAT_GROUP, METADATA_LABELS, TROPE_GROUP};
use super::{place_check_group, slugify, PageContext, Placements, TemplateHandler};
use crate::handler::anchors::Query;
use crate::model::{FieldPlacement, Rect};

/// Blank lines shorter than this are not write-in tropes.
const MIN_BLANK_WIDTH: f32 = 40.0;

/// Height given to a write-in trope field drawn as a bare underline.
const BLANK_FIELD_HEIGHT: f32 = 12.0;

/// Places the metadata form fields, heat level and trope checklist.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataHandler;

impl MetadataHandler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self
    }

    fn place_labels(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        let gap = ctx.geometry.label_gap;
        for label_text in METADATA_LABELS {
            let name = slugify(label_text);
            let Some(label) = ctx.anchors.find(Query::exact(*label_text)) else {
                log::debug!("{}: label not found", name);
                continue;
            };
            let (x0, x1) = (label.bbox.x1 + gap, ctx.right_edge());
            if x1 <= x0 {
                log::debug!("{}: label reaches the right margin", name);
                continue;
            }
            let rect = Rect::new(x0, label.bbox.y0, x1, label.bbox.y1);
            out.push(FieldPlacement::text(name, rect));
        }
    }

    /// Underscore blanks inside the trope section become write-in fields.
    fn place_custom_tropes(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        let Some((y0, y1)) = ctx.anchors.resolve(TROPE_GROUP.band) else {
            return;
        };

        let blanks = ctx
            .anchors
            .spans()
            .iter()
            .filter(|s| s.is_rule() && s.bbox.width() >= MIN_BLANK_WIDTH)
            .filter(|s| s.bbox.y0 >= y0 && s.bbox.y0 <= y1);

        for (i, blank) in blanks.enumerate() {
            let b = blank.bbox;
            let rect = Rect::new(b.x0, b.y0.min(b.y1 - BLANK_FIELD_HEIGHT), b.x1, b.y1);
            out.push(FieldPlacement::text(format!("trope_custom_{}", i + 1), rect));
        }
    }
}

impl TemplateHandler for MetadataHandler {
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        self.place_labels(ctx, out);
        let heat = place_check_group(ctx, &HEAT_GROUP, "", out);
        let tropes = place_check_group(ctx, &TROPE_GROUP, "", out);
        self.place_custom_tropes(ctx, out);
        log::debug!(
            "book metadata: {} fields ({} heat, {} tropes)",
            out.len(),
            heat,
            tropes
        );
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
        MetadataHandler::new().place(&ctx, &mut out);
        out.into_vec()
    }

    #[test]
    fn test_title_rect() {
        let page = PageLayout::a4(1)
            .with_span("Book Metadata", Rect::new(50.0, 0.0, 160.0, 14.0), 14.0)
            .with_span("Title:", Rect::new(50.0, 20.0, 80.0, 32.0), 11.0);
        let fields = run(&page);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[0].kind, FieldKind::SingleLineText);
        assert_eq!(fields[0].rect, Rect::new(84.0, 20.0, 535.0, 32.0));
    }

    #[test]
    fn test_label_names() {
        let page = PageLayout::a4(1)
            .with_span("Series & Book #:", Rect::new(50.0, 60.0, 140.0, 72.0), 11.0)
            .with_span("Publication Year:", Rect::new(50.0, 80.0, 140.0, 92.0), 11.0);
        let names: Vec<String> = run(&page).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["series_book", "publication_year"]);
    }

    #[test]
    fn test_heat_and_tropes() {
        let mut page = PageLayout::a4(1)
            .with_span("Expected Heat Level", Rect::new(50.0, 200.0, 180.0, 214.0), 12.0)
            .with_span("Anticipated Tropes", Rect::new(50.0, 300.0, 180.0, 314.0), 12.0)
            .with_span("Slow Burn", Rect::new(70.0, 330.0, 130.0, 340.0), 10.0)
            .with_span("Grumpy/Sunshine (either way)", Rect::new(70.0, 350.0, 200.0, 360.0), 10.0)
            .with_span("________________", Rect::new(70.0, 370.0, 200.0, 371.0), 10.0)
            .with_span("Expectations & Goals", Rect::new(50.0, 500.0, 200.0, 514.0), 12.0)
            .with_span("Enemies to Lovers", Rect::new(70.0, 530.0, 160.0, 540.0), 10.0);
        for d in 0..=5 {
            let x = 70.0 + d as f32 * 30.0;
            page = page.with_span(&d.to_string(), Rect::new(x, 222.0, x + 6.0, 232.0), 10.0);
        }
        // Page number far below the heat band
        page = page.with_span("3", Rect::new(290.0, 800.0, 296.0, 810.0), 9.0);

        let fields = run(&page);
        let heat: Vec<&FieldPlacement> =
            fields.iter().filter(|f| f.name.starts_with("heat_")).collect();
        assert_eq!(heat.len(), 6);
        let heat3 = fields.iter().find(|f| f.name == "heat_3").unwrap();
        assert!(heat3.rect.x1 < 160.0 && heat3.rect.y0 < 232.0);

        assert!(fields.iter().any(|f| f.name == "trope_slow_burn"));
        assert!(fields.iter().any(|f| f.name == "trope_grumpy_sunshine"));
        // Outside the trope section
        assert!(!fields.iter().any(|f| f.name == "trope_enemies_to_lovers"));

        let custom = fields.iter().find(|f| f.name == "trope_custom_1").unwrap();
        assert_eq!(custom.kind, FieldKind::SingleLineText);
        assert_eq!(custom.rect.height(), 12.0);
    }
}
