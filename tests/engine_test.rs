//! Integration tests for template detection and field placement.

use flatform::handler::{PageContext, TableDetector};
use flatform::{
    DocumentLayout, EngineOptions, FieldEngine, FieldKind, FieldPlacement, PageGeometry,
    PageLayout, PageTemplate, Rect,
};

fn find<'a>(fields: &'a [FieldPlacement], name: &str) -> Option<&'a FieldPlacement> {
    fields.iter().find(|f| f.name == name)
}

fn trope_page(number: u32) -> PageLayout {
    PageLayout::a4(number)
        .with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0)
        .with_span("PRESENT?", Rect::new(300.0, 40.0, 340.0, 48.0), 8.0)
        .with_span("Slow Burn", Rect::new(50.0, 60.0, 98.0, 70.0), 10.0)
}

fn metadata_page(number: u32) -> PageLayout {
    PageLayout::a4(number)
        .with_span("Book Metadata", Rect::new(220.0, 2.0, 330.0, 16.0), 14.0)
        .with_span("Title:", Rect::new(50.0, 20.0, 80.0, 32.0), 11.0)
        .with_span("Author:", Rect::new(50.0, 40.0, 88.0, 52.0), 11.0)
}

fn chapter_page(number: u32) -> PageLayout {
    PageLayout::a4(number)
        .with_span("CHAPTER 3", Rect::new(50.0, 40.0, 150.0, 58.0), 16.0)
        .with_span("Pages:", Rect::new(50.0, 70.0, 80.0, 80.0), 10.0)
        .with_span("POV:", Rect::new(200.0, 70.0, 222.0, 80.0), 10.0)
        .with_span("Arc Driver:", Rect::new(50.0, 92.0, 105.0, 102.0), 10.0)
        .with_span("Fantasy", Rect::new(130.0, 92.0, 165.0, 102.0), 10.0)
        .with_span("This chapter's job", Rect::new(50.0, 198.0, 150.0, 210.0), 11.0)
        .with_span("One-Sentence Summary", Rect::new(50.0, 295.0, 170.0, 307.0), 11.0)
}

fn beat_table_page(number: u32) -> PageLayout {
    PageLayout::a4(number)
        .with_span("BEAT", Rect::new(50.0, 100.0, 75.0, 108.0), 8.0)
        .with_span("CHAPTER/PAGE", Rect::new(150.0, 100.0, 210.0, 108.0), 8.0)
        .with_span("HOW IT'S", Rect::new(300.0, 100.0, 340.0, 108.0), 8.0)
        .with_span("EXECUTED", Rect::new(302.0, 112.0, 345.0, 120.0), 8.0)
        .with_span("Meet Cute", Rect::new(50.0, 140.0, 100.0, 150.0), 10.0)
}

fn process(page: &PageLayout) -> Vec<FieldPlacement> {
    FieldEngine::new().process_page(page).fields
}

// ==================== Table Pages ====================

#[test]
fn test_trope_table_yields_single_checkbox() {
    let report = FieldEngine::new().process_page(&trope_page(1));

    assert_eq!(report.template, PageTemplate::Table);
    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.fields[0].kind, FieldKind::Checkbox);
    assert_eq!(report.counts.checkbox, 1);
}

#[test]
fn test_wrapped_header_is_one_column() {
    let page = beat_table_page(1);
    let ctx = PageContext::new(&page, PageGeometry::default(), 0.5);
    let schema = TableDetector::new().detect(&ctx).unwrap();

    let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["BEAT", "CHAPTER/PAGE", "HOW IT'S EXECUTED"]);
    assert_eq!(schema.columns[2].x1, 535.0);

    let fields = process(&page);
    assert!(find(&fields, "table_r1_c2").is_some());
    assert!(find(&fields, "table_r1_c3").is_some());
    assert!(fields.iter().all(|f| f.kind == FieldKind::MultiLineText));
}

#[test]
fn test_filled_cell_stays_empty() {
    let page = trope_page(1).with_span("Yes", Rect::new(300.0, 60.0, 535.0, 140.0), 10.0);
    assert!(process(&page).is_empty());
}

// ==================== Metadata Pages ====================

#[test]
fn test_title_field_rect() {
    let fields = process(&metadata_page(1));
    let title = find(&fields, "title").unwrap();
    assert_eq!(title.kind, FieldKind::SingleLineText);
    assert_eq!(title.rect, Rect::new(84.0, 20.0, 535.0, 32.0));
    assert!(find(&fields, "author").is_some());
}

// ==================== Chapter Logs ====================

#[test]
fn test_chapter_job_write_space() {
    let fields = process(&chapter_page(1));
    let job = find(&fields, "ch3_job").unwrap();
    assert_eq!(job.kind, FieldKind::MultiLineText);
    assert_eq!((job.rect.y0, job.rect.y1), (210.0, 295.0));
}

#[test]
fn test_chapter_job_requires_bottom_anchor() {
    let mut page = chapter_page(1);
    page.spans.retain(|s| s.text != "One-Sentence Summary");
    let fields = process(&page);
    assert!(find(&fields, "ch3_job").is_none());
    // The rest of the page is still placed
    assert!(find(&fields, "ch3_pages").is_some());
}

// ==================== Classification ====================

#[test]
fn test_chapter_log_beats_reference_only() {
    let page = chapter_page(1)
        .with_span("PATTERN", Rect::new(50.0, 500.0, 100.0, 508.0), 8.0)
        .with_span("HOW IT WORKS", Rect::new(300.0, 500.0, 360.0, 508.0), 8.0);
    let engine = FieldEngine::new();
    assert_eq!(engine.classify(&page), PageTemplate::ChapterLog);

    let reference = PageLayout::a4(2)
        .with_span("PATTERN", Rect::new(50.0, 500.0, 100.0, 508.0), 8.0)
        .with_span("HOW IT WORKS", Rect::new(300.0, 500.0, 360.0, 508.0), 8.0);
    let report = engine.process_page(&reference);
    assert_eq!(report.template, PageTemplate::ReferenceOnly);
    assert!(report.is_empty());
}

#[test]
fn test_single_keyword_does_not_classify() {
    let page = PageLayout::a4(1).with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0);
    assert_eq!(FieldEngine::new().classify(&page), PageTemplate::None);
}

// ==================== Documents ====================

fn guide() -> DocumentLayout {
    let mut layout = DocumentLayout::new();
    layout.source = Some("guide.pdf".to_string());
    for n in 1..=12 {
        let page = match n % 4 {
            0 => trope_page(n),
            1 => metadata_page(n),
            2 => chapter_page(n),
            _ => beat_table_page(n),
        };
        layout.add_page(page);
    }
    layout
}

#[test]
fn test_parallel_output_identical() {
    let layout = guide();
    let sequential = FieldEngine::with_options(EngineOptions::new().sequential())
        .process_document(&layout);
    let parallel =
        FieldEngine::with_options(EngineOptions::new().with_parallel(true)).process_document(&layout);

    assert_eq!(sequential.page_count(), 12);
    assert_eq!(sequential.totals, parallel.totals);
    assert_eq!(sequential.templates, parallel.templates);
    for (a, b) in sequential.pages.iter().zip(&parallel.pages) {
        assert_eq!(a.number, b.number);
        assert_eq!(a.template, b.template);
        assert_eq!(a.fields, b.fields);
    }
}

#[test]
fn test_document_totals_match_pages() {
    let report = FieldEngine::new().process_document(&guide());
    let summed: u32 = report.pages.iter().map(|p| p.counts.total()).sum();
    assert_eq!(report.field_count(), summed);
    assert_eq!(report.template_count(PageTemplate::Table), 6);
    assert_eq!(report.template_count(PageTemplate::ChapterLog), 3);
    assert_eq!(report.template_count(PageTemplate::BookMetadata), 3);
}

#[test]
fn test_names_unique_per_page() {
    let report = FieldEngine::new().process_document(&guide());
    for page in &report.pages {
        let mut names: Vec<&str> = page.fields.iter().map(|f| f.name.as_str()).collect();
        let len = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), len, "duplicate name on page {}", page.number);
    }
}
