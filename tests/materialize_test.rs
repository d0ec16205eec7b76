//! Integration tests for preview and commit materializers.

use flatform::render::{DocumentReport, FieldMaterializer, PageReport};
use flatform::{
    DocumentLayout, FieldEngine, FieldKind, FieldPlacement, Flatform, JsonFormat, PageLayout,
    Rect, Result,
};

fn layout() -> DocumentLayout {
    let mut layout = DocumentLayout::new();
    layout.source = Some("guide.pdf".to_string());
    for n in 1..=3 {
        layout.add_page(
            PageLayout::letter(n)
                .with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0)
                .with_span("PRESENT?", Rect::new(300.0, 40.0, 340.0, 48.0), 8.0)
                .with_span("Slow Burn", Rect::new(50.0, 60.0, 98.0, 70.0), 10.0)
                .with_span("Fake Dating", Rect::new(50.0, 100.0, 110.0, 110.0), 10.0),
        );
    }
    layout
}

/// Materializer that records the order of calls.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl FieldMaterializer for Recorder {
    fn begin_page(&mut self, page: &PageReport) -> Result<()> {
        self.events.push(format!("begin {}", page.number));
        Ok(())
    }

    fn place(&mut self, page: &PageReport, field: &FieldPlacement) -> Result<()> {
        self.events.push(format!("{}:{}", page.number, field.name));
        Ok(())
    }

    fn end_page(&mut self, page: &PageReport) -> Result<()> {
        self.events.push(format!("end {}", page.number));
        Ok(())
    }
}

#[test]
fn test_materialize_call_order() {
    let engine = FieldEngine::new();
    let report = engine.process_document(&layout());

    let mut recorder = Recorder::default();
    engine.materialize(&report, &mut recorder).unwrap();

    assert_eq!(recorder.events.first().map(String::as_str), Some("begin 1"));
    assert_eq!(recorder.events.last().map(String::as_str), Some("end 3"));
    assert_eq!(recorder.events.len(), 3 * 2 + report.field_count() as usize);
    assert!(recorder.events.contains(&"2:table_r2_c2".to_string()));
}

#[test]
fn test_widget_plan_document_unique_names() {
    let result = Flatform::new().process_layout(&layout());
    let plan = result.widget_plan().unwrap();

    let mut names: Vec<&str> = plan.items().map(|(_, w)| w.name.as_str()).collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"table_r1_c2"));
    assert!(names.contains(&"table_r1_c2_p2"));
    assert!(names.contains(&"table_r2_c2_p3"));

    names.sort();
    names.dedup();
    assert_eq!(names.len(), 6);
}

#[test]
fn test_widget_styles() {
    let mut report = DocumentReport::new(None);
    report.add_page(PageReport::new(
        1,
        (612.0, 792.0),
        flatform::PageTemplate::Table,
        vec![
            FieldPlacement::checkbox("c", Rect::new(100.0, 100.0, 120.0, 120.0)),
            FieldPlacement::text("t", Rect::new(100.0, 200.0, 300.0, 214.0)),
            FieldPlacement::textarea("a", Rect::new(100.0, 300.0, 300.0, 372.0)),
        ],
    ));

    let mut widgets = flatform::WidgetPlan::new();
    FieldEngine::new().materialize(&report, &mut widgets).unwrap();
    let plan = widgets.into_plan();
    let items = &plan.pages[0].items;

    let checkbox = &items[0];
    assert_eq!(checkbox.kind, FieldKind::Checkbox);
    assert_eq!(checkbox.rect, Rect::new(103.0, 103.0, 117.0, 117.0));
    assert_eq!(checkbox.style.border_width, 1.0);
    assert_eq!(checkbox.style.background, Some([1.0, 1.0, 1.0]));

    let text = &items[1];
    assert_eq!(text.rect, Rect::new(102.0, 202.0, 298.0, 212.0));
    assert_eq!(text.style.font_size, Some(10.0));
    assert!(!text.style.multiline);
    assert_eq!(text.style.background, Some([1.0, 1.0, 1.0]));

    let area = &items[2];
    assert!(area.style.multiline);
    assert_eq!(area.style.background, Some([1.0, 1.0, 1.0]));
    assert_eq!(area.style.border_width, 0.0);
    assert_eq!(area.style.font_size, Some(9.0));
    assert_eq!(area.pdf_rect, [100.0, 420.0, 300.0, 492.0]);
}

#[test]
fn test_preview_plan_json() {
    let result = Flatform::new().preview().process_layout(&layout());
    let json = result.plan_json(JsonFormat::Pretty).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "preview");
    assert_eq!(value["source"], "guide.pdf");
    assert_eq!(value["pages"].as_array().unwrap().len(), 3);

    let stroke = &value["pages"][0]["items"][0];
    assert_eq!(stroke["width"], 1.0);
    assert_eq!(stroke["kind"], "checkbox");
}
