//! Human-readable table for terminals

use crate::report::{format_cell, MergedReport};
use std::fmt::Write;

/// Render `report` as a left-aligned, space-padded table
pub fn render_text(report: &MergedReport, unit_suffix: &str, na_marker: &str) -> String {
    let mut table: Vec<Vec<String>> = Vec::with_capacity(report.rows.len() + 1);
    table.push(report.header().into_iter().map(String::from).collect());
    for row in &report.rows {
        table.push(
            std::iter::once(row.file_name.clone())
                .chain(row.cells.iter().map(|c| format_cell(*c, unit_suffix, na_marker)))
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..table[0].len())
        .map(|col| {
            table
                .iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (idx, row) in table.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());

        if idx == 0 {
            let rule = widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("  ");
            let _ = writeln!(out, "{}", rule);
        }
    }
    out
}
