//! Page template detection.

use crate::handler::anchors::{chapter_number, MatchMode};
use crate::handler::rules::{Clause, TEMPLATE_RULES};
use crate::model::{PageLayout, PageTemplate, TextSpan};

/// Classify a page into one of the known templates.
///
/// Rules are evaluated in a fixed priority order and the first match wins.
/// Only set membership and substring search over the page text are
/// consulted, so the result does not depend on span geometry.
///
/// # Arguments
/// * `page` - The page layout to classify
///
/// # Returns
/// * The detected template, or `PageTemplate::None` when nothing matches
///
/// # Example
/// ```
/// use flatform::detect::classify_page;
/// use flatform::{PageLayout, PageTemplate, Rect};
///
/// let page = PageLayout::a4(1)
///     .with_span("TROPE", Rect::new(50.0, 40.0, 80.0, 48.0), 8.0)
///     .with_span("PRESENT?", Rect::new(300.0, 40.0, 340.0, 48.0), 8.0);
/// assert_eq!(classify_page(&page), PageTemplate::Table);
/// ```
pub fn classify_page(page: &PageLayout) -> PageTemplate {
    classify_spans(&page.spans)
}

/// Classify a bare span list. See [`classify_page`].
pub fn classify_spans(spans: &[TextSpan]) -> PageTemplate {
    let page_text = spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    TEMPLATE_RULES
        .iter()
        .find(|rule| {
            rule.all_of
                .iter()
                .all(|clause| clause_holds(clause, spans, &page_text))
        })
        .map(|rule| rule.template)
        .unwrap_or(PageTemplate::None)
}

/// Chapter number from the page's `CHAPTER <n>` heading, if any.
pub fn page_chapter(spans: &[TextSpan]) -> Option<u32> {
    spans.iter().find_map(chapter_number)
}

fn clause_holds(clause: &Clause, spans: &[TextSpan], page_text: &str) -> bool {
    match clause.mode {
        MatchMode::ChapterHeading => page_chapter(spans).is_some(),
        MatchMode::PageText => clause.any_of.iter().any(|n| page_text.contains(n)),
        MatchMode::Exact => spans
            .iter()
            .any(|s| clause.any_of.iter().any(|n| *n == s.trimmed())),
        MatchMode::Contains => spans
            .iter()
            .any(|s| clause.any_of.iter().any(|n| s.text.contains(n))),
        MatchMode::Prefix => spans
            .iter()
            .any(|s| clause.any_of.iter().any(|n| s.trimmed().starts_with(n))),
    }
}
