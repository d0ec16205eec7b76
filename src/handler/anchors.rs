//! Anchor lookup over a page's text spans.
//!
//! Handlers never scan spans directly. They describe what they look for with
//! a [`Query`] (needle plus match mode) and a vertical [`Band`], and the
//! [`AnchorIndex`] answers in reading order.

use crate::model::{Rect, TextSpan};
use regex::Regex;
use std::sync::OnceLock;

/// Slack allowed when deciding whether a span starts inside a column.
const COLUMN_SLACK: f32 = 5.0;

/// How a needle is compared with span text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Trimmed span text equals the needle
    Exact,
    /// Span text contains the needle
    Contains,
    /// Trimmed span text starts with the needle
    Prefix,
    /// The page's concatenated text contains the needle
    PageText,
    /// Span is a `CHAPTER <digits>` heading; the needle is ignored
    ChapterHeading,
}

/// A needle and the way it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub text: &'static str,
    pub mode: MatchMode,
}

impl Query {
    pub const fn exact(text: &'static str) -> Self {
        Self {
            text,
            mode: MatchMode::Exact,
        }
    }

    pub const fn contains(text: &'static str) -> Self {
        Self {
            text,
            mode: MatchMode::Contains,
        }
    }

    pub const fn prefix(text: &'static str) -> Self {
        Self {
            text,
            mode: MatchMode::Prefix,
        }
    }

    /// Check a single span against the query.
    ///
    /// `PageText` degrades to a per-span substring test here; page-level
    /// evaluation lives in the classifier.
    pub fn matches(&self, span: &TextSpan) -> bool {
        match self.mode {
            MatchMode::Exact => span.trimmed() == self.text,
            MatchMode::Contains | MatchMode::PageText => span.text.contains(self.text),
            MatchMode::Prefix => span.trimmed().starts_with(self.text),
            MatchMode::ChapterHeading => chapter_number(span).is_some(),
        }
    }
}

fn chapter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^CHAPTER\s+(\d+)\b").unwrap())
}

/// Chapter number of a span starting with a `CHAPTER <digits>` heading.
pub fn chapter_number(span: &TextSpan) -> Option<u32> {
    chapter_pattern()
        .captures(span.trimmed())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Vertical region of a page in which a group of anchors is searched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Fixed `y0..=y1` in page space
    Fixed(f32, f32),
    /// From the top of `anchor` down to `depth` points below its bottom
    After { anchor: Query, depth: f32 },
    /// From the top of `start` to the top of the next `end` below it,
    /// or to the page bottom when `end` is missing
    Between { start: Query, end: Query },
    /// The whole page
    Page,
}

/// Horizontal limits of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x0: f32,
    pub x1: f32,
}

impl Column {
    pub fn new(x0: f32, x1: f32) -> Self {
        Self { x0, x1 }
    }

    /// Check whether a span starts inside the column.
    pub fn holds(&self, span: &TextSpan) -> bool {
        span.bbox.x0 >= self.x0 - COLUMN_SLACK && span.bbox.x0 < self.x1
    }
}

/// Spans of one page in reading order (top to bottom, then left to right).
pub struct AnchorIndex<'a> {
    spans: Vec<&'a TextSpan>,
    page_height: f32,
}

impl<'a> AnchorIndex<'a> {
    /// Create a new index over `spans`.
    pub fn new(spans: &'a [TextSpan], page_height: f32) -> Self {
        let mut spans: Vec<&TextSpan> = spans.iter().collect();
        spans.sort_by(|a, b| {
            a.bbox
                .y0
                .total_cmp(&b.bbox.y0)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });
        Self { spans, page_height }
    }

    /// All spans in reading order.
    pub fn spans(&self) -> &[&'a TextSpan] {
        &self.spans
    }

    /// Topmost span matching `query`.
    pub fn find(&self, query: Query) -> Option<&'a TextSpan> {
        self.spans.iter().copied().find(|s| query.matches(s))
    }

    /// All spans matching `query`, in reading order.
    pub fn find_all(&self, query: Query) -> Vec<&'a TextSpan> {
        self.spans
            .iter()
            .copied()
            .filter(|s| query.matches(s))
            .collect()
    }

    /// Spans matching `query` that start inside `band` (and `column`, when given).
    pub fn find_in(
        &self,
        query: Query,
        band: (f32, f32),
        column: Option<Column>,
    ) -> Vec<&'a TextSpan> {
        self.spans
            .iter()
            .copied()
            .filter(|s| s.bbox.y0 >= band.0 && s.bbox.y0 <= band.1)
            .filter(|s| column.map_or(true, |c| c.holds(s)))
            .filter(|s| query.matches(s))
            .collect()
    }

    /// Topmost span matching `query` inside `band` and `column`.
    pub fn find_first_in(
        &self,
        query: Query,
        band: (f32, f32),
        column: Option<Column>,
    ) -> Option<&'a TextSpan> {
        self.find_in(query, band, column).into_iter().next()
    }

    /// Nearest span matching `query` that starts at or below `y`.
    pub fn nearest_below(
        &self,
        query: Query,
        y: f32,
        column: Option<Column>,
    ) -> Option<&'a TextSpan> {
        self.find_first_in(query, (y, f32::INFINITY), column)
    }

    /// Nearest non-rule span to the right of `span` on the same line.
    pub fn next_on_line(&self, span: &TextSpan) -> Option<&'a TextSpan> {
        self.spans
            .iter()
            .copied()
            .filter(|s| !s.is_rule())
            .filter(|s| s.bbox.x0 >= span.bbox.x1 && s.bbox.overlaps_vertically(&span.bbox))
            .min_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0))
    }

    /// Resolve a band to concrete `y0..=y1` limits.
    ///
    /// Returns `None` when the band's anchor is not on the page.
    pub fn resolve(&self, band: Band) -> Option<(f32, f32)> {
        match band {
            Band::Fixed(y0, y1) => Some((y0, y1)),
            Band::Page => Some((0.0, self.page_height)),
            Band::After { anchor, depth } => {
                let a = self.find(anchor)?;
                Some((a.bbox.y0 - 2.0, a.bbox.y1 + depth))
            }
            Band::Between { start, end } => {
                let s = self.find(start)?;
                let bottom = self
                    .nearest_below(end, s.bbox.y1, None)
                    .map_or(self.page_height, |e| e.bbox.y0);
                Some((s.bbox.y0, bottom))
            }
        }
    }

    /// Check whether any span with font size at least `min_font` overlaps
    /// `rect` by more than `threshold` of the smaller area.
    pub fn occupied(&self, rect: &Rect, min_font: f32, threshold: f32) -> bool {
        self.spans
            .iter()
            .filter(|s| s.font_size >= min_font)
            .any(|s| super::dedup::overlaps(&s.bbox, rect, threshold))
    }
}
