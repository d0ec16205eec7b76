//! Table detection from text geometry alone.
//!
//! Worksheet tables are drawn without reliable ruling lines, so the header
//! row and row boundaries are inferred from text positions:
//!
//! 1. small all-caps spans clustered into rows; the fullest row is the header
//! 2. headers that start at the same x are one wrapped header
//! 3. each header starts a column that runs to the next header
//! 4. spans in the first column below the header mark the rows
//! 5. every empty cell right of the label column gets a field

use super::rules::TableConfig;
use super::{PageContext, Placements, TemplateHandler};
use crate::model::{FieldPlacement, Rect, TextSpan};

/// A merged column header.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    /// Header text, wrapped lines joined with spaces
    pub text: String,
    /// Union of the header's spans
    pub bbox: Rect,
}

/// A column of a detected table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    /// Header text
    pub name: String,
    /// Left boundary
    pub x0: f32,
    /// Right boundary
    pub x1: f32,
}

/// The inferred structure of a table on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Columns, left to right; the first is the label column
    pub columns: Vec<TableColumn>,
    /// Top edge of each row, top to bottom
    pub row_tops: Vec<f32>,
    /// Bottom edge of the header row
    pub header_bottom: f32,
    /// Lowest y any row may reach
    pub bottom: f32,
}

impl TableSchema {
    /// Bottom edge of row `index`.
    ///
    /// Rows end at the next row's top; the last row is capped at
    /// `max_last_row_height` and at the table bottom.
    pub fn row_bottom(&self, index: usize, max_last_row_height: f32) -> f32 {
        match self.row_tops.get(index + 1) {
            Some(next) => *next,
            None => (self.row_tops[index] + max_last_row_height).min(self.bottom),
        }
    }

    /// Check whether cells of `column` are checkboxes.
    fn is_checkbox_column(&self, column: usize, config: &TableConfig) -> bool {
        let name = self.columns[column].name.to_uppercase();
        config.checkbox_headers.iter().any(|h| name.contains(h))
    }
}

/// Detects tables and fills their empty cells.
#[derive(Debug, Clone)]
pub struct TableDetector {
    config: TableConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
        }
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Get the detector configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Infer the table structure of a page.
    ///
    /// Returns `None` when no header row with at least two headers exists.
    pub fn detect(&self, ctx: &PageContext<'_>) -> Option<TableSchema> {
        let spans = ctx.anchors.spans();
        log::debug!("TableDetector: starting with {} spans", spans.len());

        // Step 1: Pick the header row
        let header_row = self.header_row(spans, ctx.geometry.top_margin)?;
        log::debug!("TableDetector: header row has {} spans", header_row.len());

        // Step 2: Merge wrapped headers
        let headers = self.merge_headers(&header_row);
        if headers.len() < 2 {
            log::debug!(
                "TableDetector: only {} header(s) after merging",
                headers.len()
            );
            return None;
        }
        log::debug!(
            "TableDetector: headers = {:?}",
            headers.iter().map(|h| h.text.as_str()).collect::<Vec<_>>()
        );

        // Step 3: Column boundaries
        let columns = self.columns(&headers, ctx.right_edge());
        let header_bottom = headers
            .iter()
            .map(|h| h.bbox.y1)
            .fold(f32::MIN, f32::max);
        let bottom = ctx.bottom_edge();

        // Step 4: Row boundaries
        let row_tops = self.row_tops(spans, &columns[0], header_bottom, bottom);
        log::debug!("TableDetector: row tops = {:?}", row_tops);

        Some(TableSchema {
            columns,
            row_tops,
            header_bottom,
            bottom,
        })
    }

    /// Cluster header candidates into rows and return the fullest one.
    fn header_row<'a>(&self, spans: &[&'a TextSpan], top_margin: f32) -> Option<Vec<&'a TextSpan>> {
        let mut candidates: Vec<&TextSpan> = spans
            .iter()
            .copied()
            .filter(|s| {
                s.is_uppercase()
                    && s.trimmed().chars().count() > 1
                    && s.font_size < self.config.header_max_font
                    && s.bbox.y0 > top_margin
            })
            .collect();
        candidates.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        let rows = cluster_by_y(candidates, self.config.header_row_tolerance);
        log::debug!("TableDetector: {} header candidate rows", rows.len());

        // Ties go to the topmost row
        let mut best: Option<Vec<&TextSpan>> = None;
        for row in rows {
            if best.as_ref().map_or(true, |b| row.len() > b.len()) {
                best = Some(row);
            }
        }

        match best {
            Some(row) if row.len() >= 2 => Some(row),
            _ => {
                log::debug!("TableDetector: no header row with 2+ members");
                None
            }
        }
    }

    /// Merge headers whose left edges are within the merge tolerance.
    fn merge_headers(&self, row: &[&TextSpan]) -> Vec<TableHeader> {
        let mut sorted: Vec<&TextSpan> = row.to_vec();
        sorted.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let mut groups: Vec<Vec<&TextSpan>> = Vec::new();
        for span in sorted {
            match groups.last_mut() {
                Some(group)
                    if (span.bbox.x0 - group[0].bbox.x0).abs()
                        <= self.config.header_merge_tolerance =>
                {
                    group.push(span)
                }
                _ => groups.push(vec![span]),
            }
        }

        groups
            .into_iter()
            .map(|mut group| {
                group.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));
                let text = group
                    .iter()
                    .map(|s| s.trimmed())
                    .collect::<Vec<_>>()
                    .join(" ");
                let bbox = group
                    .iter()
                    .skip(1)
                    .fold(group[0].bbox, |acc, s| acc.union(&s.bbox));
                TableHeader { text, bbox }
            })
            .collect()
    }

    /// Each column runs from its header to the next header minus the gutter.
    fn columns(&self, headers: &[TableHeader], right_edge: f32) -> Vec<TableColumn> {
        headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let x1 = match headers.get(i + 1) {
                    Some(next) => next.bbox.x0 - self.config.column_gutter,
                    None => right_edge,
                };
                TableColumn {
                    name: h.text.clone(),
                    x0: h.bbox.x0,
                    x1,
                }
            })
            .collect()
    }

    /// Row tops from the labels in the first column, or evenly spaced
    /// placeholder rows when the first column is blank.
    fn row_tops(
        &self,
        spans: &[&TextSpan],
        first: &TableColumn,
        header_bottom: f32,
        bottom: f32,
    ) -> Vec<f32> {
        let mut labels: Vec<&TextSpan> = spans
            .iter()
            .copied()
            .filter(|s| {
                s.bbox.y0 >= header_bottom
                    && s.bbox.y0 < bottom
                    && s.bbox.x0 >= first.x0 - self.config.row_label_slack
                    && s.bbox.x0 < first.x1
                    && s.font_size >= self.config.row_label_min_font
                    && !s.is_rule()
            })
            .collect();
        labels.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        if labels.is_empty() {
            let step = self.config.placeholder_row_height;
            let mut tops = vec![header_bottom];
            let mut y = header_bottom + step;
            while y < bottom {
                tops.push(y);
                y += step;
            }
            log::debug!(
                "TableDetector: no row labels, {} placeholder rows",
                tops.len()
            );
            return tops;
        }

        cluster_by_y(labels, self.config.row_tolerance)
            .iter()
            .map(|row| row[0].bbox.y0)
            .collect()
    }

    /// Place a field in every empty cell right of the label column.
    pub fn place_cells(&self, ctx: &PageContext<'_>, schema: &TableSchema, out: &mut Placements) {
        let cfg = &self.config;

        for (r, &top) in schema.row_tops.iter().enumerate() {
            let bottom = schema.row_bottom(r, cfg.max_last_row_height);
            if bottom - top < cfg.min_row_height {
                log::debug!(
                    "TableDetector: skipping row {} ({:.1}pt tall)",
                    r + 1,
                    bottom - top
                );
                continue;
            }

            for (c, column) in schema.columns.iter().enumerate().skip(1) {
                let name = format!("table_r{}_c{}", r + 1, c + 1);
                if column.x1 <= column.x0 {
                    log::debug!("{}: column has no width", name);
                    continue;
                }
                let cell = Rect::new(column.x0, top, column.x1, bottom);

                let probe = cell.expand(cfg.occupied_tolerance);
                if ctx
                    .anchors
                    .occupied(&probe, cfg.occupied_min_font, ctx.overlap_threshold)
                {
                    log::debug!("{}: cell already holds text", name);
                    continue;
                }

                let placement = if schema.is_checkbox_column(c, cfg) {
                    let (cx, _) = cell.center();
                    let rect = Rect::from_size(
                        cx - cfg.checkbox_size / 2.0,
                        top + cfg.checkbox_offset,
                        cfg.checkbox_size,
                        cfg.checkbox_size,
                    );
                    FieldPlacement::checkbox(name, rect)
                } else {
                    FieldPlacement::textarea(name, cell.inset(cfg.cell_inset))
                };
                out.push(placement);
            }
        }
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateHandler for TableDetector {
    fn place(&self, ctx: &PageContext<'_>, out: &mut Placements) {
        if let Some(schema) = self.detect(ctx) {
            self.place_cells(ctx, &schema, out);
            log::debug!(
                "TableDetector: {} columns x {} rows, {} fields",
                schema.columns.len(),
                schema.row_tops.len(),
                out.len()
            );
        }
    }
}

/// Group spans sorted by y into rows; a span joins the current row when it
/// starts within `tolerance` of the row's first member.
fn cluster_by_y<'a>(sorted: Vec<&'a TextSpan>, tolerance: f32) -> Vec<Vec<&'a TextSpan>> {
    let mut rows: Vec<Vec<&TextSpan>> = Vec::new();
    for span in sorted {
        match rows.last_mut() {
            Some(row) if span.bbox.y0 - row[0].bbox.y0 <= tolerance => row.push(span),
            _ => rows.push(vec![span]),
        }
    }
    rows
}
