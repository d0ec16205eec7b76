//! Per-page placement pipeline.
//!
//! The engine classifies each page, hands it to the matching handler and
//! collects the placements into a [`DocumentReport`]. Materialization is a
//! separate, sequential step over a finished report.

mod options;

pub use options::{EngineOptions, PageGeometry};

use rayon::prelude::*;

use crate::detect::classify_page;
use crate::error::Result;
use crate::handler::{
    ChapterLogHandler, MetadataHandler, PageContext, Placements, QuestionsHandler, ShapeDetector,
    TableDetector, TemplateHandler,
};
use crate::model::{DocumentLayout, PageLayout, PageTemplate};
use crate::render::{DocumentReport, FieldMaterializer, PageReport, PageSelection};

/// Runs classification and placement over pages and documents.
#[derive(Debug, Clone, Default)]
pub struct FieldEngine {
    options: EngineOptions,
    chapter_log: ChapterLogHandler,
    metadata: MetadataHandler,
    questions: QuestionsHandler,
    table: TableDetector,
    shapes: ShapeDetector,
}

impl FieldEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace the table detector, e.g. to tune its thresholds.
    pub fn with_table_detector(mut self, table: TableDetector) -> Self {
        self.table = table;
        self
    }

    /// Replace the drawn-shape detector.
    pub fn with_shape_detector(mut self, shapes: ShapeDetector) -> Self {
        self.shapes = shapes;
        self
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Template of a page.
    pub fn classify(&self, page: &PageLayout) -> PageTemplate {
        classify_page(page)
    }

    fn handler_for(&self, template: PageTemplate) -> Option<&dyn TemplateHandler> {
        match template {
            PageTemplate::ChapterLog => Some(&self.chapter_log),
            PageTemplate::BookMetadata => Some(&self.metadata),
            PageTemplate::WriteQuestions => Some(&self.questions),
            PageTemplate::Table => Some(&self.table),
            PageTemplate::ReferenceOnly => None,
            PageTemplate::None if self.options.shape_fallback => Some(&self.shapes),
            PageTemplate::None => None,
        }
    }

    /// Classify a page and place its fields.
    pub fn process_page(&self, page: &PageLayout) -> PageReport {
        let template = self.classify(page);
        let ctx = PageContext::new(page, self.options.geometry, self.options.overlap_threshold);

        let mut out = Placements::new();
        match self.handler_for(template) {
            Some(handler) => handler.place(&ctx, &mut out),
            None => log::debug!("page {}: {} page, no fields", page.number, template),
        }

        let report = PageReport::new(page.number, (page.width, page.height), template, out.into_vec());
        log::debug!(
            "page {}: {} with {} fields",
            page.number,
            template,
            report.fields.len()
        );
        report
    }

    /// Process the selected pages of a document.
    ///
    /// Pages keep document order whether or not they are processed in
    /// parallel.
    pub fn process_document(&self, layout: &DocumentLayout) -> DocumentReport {
        let selection = &self.options.pages;
        if let PageSelection::Pages(numbers) = selection {
            for n in numbers {
                if layout.get_page(*n).is_none() {
                    log::warn!(
                        "page {} not in layout ({} pages), skipped",
                        n,
                        layout.page_count()
                    );
                }
            }
        }

        let pages: Vec<&PageLayout> = layout
            .pages
            .iter()
            .filter(|p| selection.includes(p.number))
            .collect();

        let reports: Vec<PageReport> = if self.options.parallel {
            pages.par_iter().map(|p| self.process_page(p)).collect()
        } else {
            pages.iter().map(|p| self.process_page(p)).collect()
        };

        let mut report = DocumentReport::new(layout.source.clone());
        for page in reports {
            report.add_page(page);
        }

        log::info!(
            "placed {} fields on {} pages ({} checkbox, {} text, {} textarea)",
            report.field_count(),
            report.page_count(),
            report.totals.checkbox,
            report.totals.text,
            report.totals.textarea
        );
        report
    }

    /// Feed a finished report to a materializer, page by page.
    pub fn materialize<M: FieldMaterializer + ?Sized>(
        &self,
        report: &DocumentReport,
        materializer: &mut M,
    ) -> Result<()> {
        materializer.begin_document(report)?;
        for page in &report.pages {
            materializer.begin_page(page)?;
            for field in &page.fields {
                materializer.place(page, field)?;
            }
            materializer.end_page(page)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, Rect};
    use crate::render::{PreviewOverlay, WidgetPlan};

    fn table_page(number: u32) -> PageLayout {
        PageLayout::a4(number)
            .with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0)
            .with_span("PRESENT?", Rect::new(300.0, 40.0, 340.0, 48.0), 8.0)
            .with_span("Slow Burn", Rect::new(50.0, 60.0, 98.0, 70.0), 10.0)
    }

    fn layout() -> DocumentLayout {
        let mut layout = DocumentLayout::new();
        layout.source = Some("guide.pdf".to_string());
        layout.add_page(table_page(1));
        layout.add_page(
            PageLayout::a4(2)
                .with_span("Book Metadata", Rect::new(220.0, 2.0, 330.0, 16.0), 14.0)
                .with_span("Title:", Rect::new(50.0, 20.0, 80.0, 32.0), 11.0),
        );
        layout.add_page(PageLayout::a4(3));
        layout.add_page(table_page(4));
        layout
    }

    #[test]
    fn test_process_page_dispatch() {
        let engine = FieldEngine::new();
        let report = engine.process_page(&table_page(1));
        assert_eq!(report.template, PageTemplate::Table);
        assert_eq!(report.counts.checkbox, 1);
    }

    #[test]
    fn test_engine_is_clone_and_debug() {
        let engine = FieldEngine::new().with_table_detector(TableDetector::new());
        let copy = engine.clone();
        assert!(format!("{:?}", copy).contains("TableDetector"));
        assert_eq!(
            copy.process_page(&table_page(1)).fields,
            engine.process_page(&table_page(1)).fields
        );
    }

    #[test]
    fn test_unrecognized_page_has_no_fields() {
        let mut page = PageLayout::a4(1);
        page.add_shape(Rect::from_size(50.0, 100.0, 12.0, 12.0));

        let report = FieldEngine::new().process_page(&page);
        assert_eq!(report.template, PageTemplate::None);
        assert!(report.is_empty());

        let engine = FieldEngine::with_options(EngineOptions::new().with_shape_fallback(true));
        let report = engine.process_page(&page);
        assert_eq!(report.fields.len(), 1);
        assert_eq!(report.fields[0].kind, FieldKind::Checkbox);
    }

    #[test]
    fn test_process_document_totals() {
        let report = FieldEngine::new().process_document(&layout());
        assert_eq!(report.page_count(), 4);
        assert_eq!(report.source.as_deref(), Some("guide.pdf"));
        assert_eq!(report.template_count(PageTemplate::Table), 2);
        assert_eq!(report.template_count(PageTemplate::None), 1);
        assert_eq!(report.totals.checkbox, 2);
    }

    #[test]
    fn test_page_selection() {
        let options = EngineOptions::new().with_pages(PageSelection::Pages(vec![2, 4, 9]));
        let report = FieldEngine::with_options(options).process_document(&layout());
        let numbers: Vec<u32> = report.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 4]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let layout = layout();
        let sequential = FieldEngine::new().process_document(&layout);
        let parallel = FieldEngine::with_options(EngineOptions::new().with_parallel(true))
            .process_document(&layout);

        assert_eq!(sequential.totals, parallel.totals);
        for (a, b) in sequential.pages.iter().zip(&parallel.pages) {
            assert_eq!(a.number, b.number);
            assert_eq!(a.fields, b.fields);
        }
    }

    #[test]
    fn test_materialize() {
        let engine = FieldEngine::new();
        let report = engine.process_document(&layout());

        let mut widgets = WidgetPlan::new();
        engine.materialize(&report, &mut widgets).unwrap();
        let plan = widgets.into_plan();
        assert_eq!(plan.pages.len(), 4);
        assert_eq!(plan.item_count(), report.field_count() as usize);
        assert_eq!(plan.source.as_deref(), Some("guide.pdf"));

        // Same table cell on pages 1 and 4
        let names: Vec<&str> = plan.items().map(|(_, w)| w.name.as_str()).collect();
        assert!(names.contains(&"table_r1_c2"));
        assert!(names.contains(&"table_r1_c2_p4"));

        let mut overlay = PreviewOverlay::new();
        engine.materialize(&report, &mut overlay).unwrap();
        assert_eq!(overlay.plan().item_count(), plan.item_count());
    }
}
