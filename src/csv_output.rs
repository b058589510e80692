//! CSV output format for merged reports
//!
//! The canonical export: `File Name,<pair keys...>` then one row per file,
//! bandwidth cells suffixed with the unit and missing cells as the marker.

use crate::report::{format_cell, MergedReport};
use anyhow::{Context, Result};

/// CSV report formatter
#[derive(Debug, Clone)]
pub struct CsvReportOutput {
    unit_suffix: String,
    na_marker: String,
}

impl CsvReportOutput {
    /// Create a new CSV formatter
    pub fn new(unit_suffix: impl Into<String>, na_marker: impl Into<String>) -> Self {
        Self {
            unit_suffix: unit_suffix.into(),
            na_marker: na_marker.into(),
        }
    }

    /// Format one file's row
    fn format_row(&self, file_name: &str, cells: &[Option<f64>]) -> Vec<String> {
        std::iter::once(file_name.to_string())
            .chain(
                cells
                    .iter()
                    .map(|cell| format_cell(*cell, &self.unit_suffix, &self.na_marker)),
            )
            .collect()
    }

    /// Generate CSV output as string
    ///
    /// Rows end with CRLF; fields holding commas, quotes or line breaks are
    /// quoted.
    pub fn to_csv(&self, report: &MergedReport) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());

        writer
            .write_record(report.header())
            .context("Failed to write CSV header")?;
        for row in &report.rows {
            writer
                .write_record(self.format_row(&row.file_name, &row.cells))
                .with_context(|| format!("Failed to write CSV row for {}", row.file_name))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Failed to flush CSV output: {}", err))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

impl Default for CsvReportOutput {
    fn default() -> Self {
        Self::new("Kbps", "N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportRow;

    fn report() -> MergedReport {
        MergedReport {
            columns: vec!["vc_a".to_string(), "vc_b".to_string()],
            rows: vec![
                ReportRow {
                    file_name: "one.csv".to_string(),
                    cells: vec![Some(70.0), None],
                },
                ReportRow {
                    file_name: "two.csv".to_string(),
                    cells: vec![None, Some(0.0)],
                },
            ],
        }
    }

    #[test]
    fn test_csv_header() {
        let csv = CsvReportOutput::default().to_csv(&report()).unwrap();
        assert!(csv.starts_with("File Name,vc_a,vc_b\r\n"));
    }

    #[test]
    fn test_csv_quotes_file_name_with_comma() {
        let report = MergedReport {
            columns: vec!["vc_a".to_string()],
            rows: vec![ReportRow {
                file_name: "flows,march.csv".to_string(),
                cells: vec![Some(1.5)],
            }],
        };
        let csv = CsvReportOutput::default().to_csv(&report).unwrap();
        assert!(csv.contains("\"flows,march.csv\",1.5 Kbps\r\n"));
    }

    #[test]
    fn test_csv_quotes_embedded_quote() {
        let csv = CsvReportOutput::new("Kbps", "say \"n/a\"")
            .to_csv(&report())
            .unwrap();
        assert!(csv.contains("one.csv,70.0 Kbps,\"say \"\"n/a\"\"\"\r\n"));
    }

    #[test]
    fn test_csv_full_output() {
        let csv = CsvReportOutput::default().to_csv(&report()).unwrap();
        assert_eq!(
            csv,
            "File Name,vc_a,vc_b\r\none.csv,70.0 Kbps,N/A\r\ntwo.csv,N/A,0.0 Kbps\r\n"
        );
    }

    #[test]
    fn test_csv_custom_marker_and_unit() {
        let csv = CsvReportOutput::new("kb/s", "-").to_csv(&report()).unwrap();
        assert!(csv.contains("one.csv,70.0 kb/s,-"));
    }

    #[test]
    fn test_csv_empty_report() {
        let csv = CsvReportOutput::default().to_csv(&MergedReport::default()).unwrap();
        assert_eq!(csv, "File Name\r\n");
    }
}
