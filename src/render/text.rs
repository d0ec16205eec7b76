//! Plain text summary of a placement run.

use std::fmt::Write;

use crate::error::{Error, Result};

use super::{DocumentReport, FieldCounts};

fn describe(counts: &FieldCounts) -> String {
    format!(
        "{} fields ({} checkbox, {} text, {} textarea)",
        counts.total(),
        counts.checkbox,
        counts.text,
        counts.textarea
    )
}

/// Render a human-readable summary of a report.
///
/// One line per page, followed by the document totals and the template
/// histogram.
pub fn to_text(report: &DocumentReport) -> Result<String> {
    let mut out = String::new();
    let source = report.source.as_deref().unwrap_or("<layout>");

    let mut write = || -> std::fmt::Result {
        writeln!(out, "{}: {} pages", source, report.page_count())?;
        for page in &report.pages {
            writeln!(
                out,
                "  page {:>3}  {:<16} {}",
                page.number,
                page.template.label(),
                describe(&page.counts)
            )?;
        }
        writeln!(out, "total: {}", describe(&report.totals))?;

        let histogram = report
            .templates
            .iter()
            .map(|(template, n)| format!("{} {}", template, n))
            .collect::<Vec<_>>()
            .join(", ");
        write!(out, "templates: {}", histogram)
    };
    write().map_err(|e| Error::Render(e.to_string()))?;

    Ok(out)
}
