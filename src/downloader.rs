#![cfg(not(tarpaulin_include))]

use crate::error::{DashboardError, Result};
use crate::loader::{CriteriaRow, ScoreRow};
use std::path::{Path, PathBuf};

/// MIME type of the file offered for download
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// State of the optional download file, checked on every render
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadFile {
    /// The file exists; `file_name` is what the browser saves it as
    Available { path: PathBuf, file_name: String },

    /// Nothing exists at the configured path
    Missing { path: PathBuf },
}

impl DownloadFile {
    /// Check the configured path. Only existence matters here; the bytes are
    /// read when the download is actually requested.
    pub fn locate(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            DownloadFile::Available { path, file_name }
        } else {
            DownloadFile::Missing { path }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DownloadFile::Available { .. })
    }

    /// Raw bytes of the file
    ///
    /// # Errors
    /// * `MissingOptionalFile` if the file is absent
    /// * `Io` if it exists but cannot be read
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            DownloadFile::Available { path, .. } => Ok(std::fs::read(path)?),
            DownloadFile::Missing { path } => {
                Err(DashboardError::MissingOptionalFile { path: path.clone() })
            }
        }
    }
}

/// Score table as CSV, final score with one decimal
pub fn scores_to_csv(rows: &[ScoreRow]) -> String {
    let mut csv_content = String::from("EOR Method,Validation,Final Score\n");
    for row in rows {
        let fields = [
            row.method.clone(),
            row.validation.map(|v| v.to_string()).unwrap_or_default(),
            row.final_score
                .map(|v| format!("{:.1}", v))
                .unwrap_or_default(),
        ];
        push_csv_record(&mut csv_content, &fields);
    }
    csv_content
}

/// Failing criteria as CSV
pub fn criteria_to_csv(rows: &[CriteriaRow]) -> String {
    let mut csv_content = String::from("EOR Method,Criterion,Value,Meets\n");
    for row in rows {
        let fields = [
            row.method.to_string(),
            row.criterion.to_string(),
            row.value.to_string(),
            row.status.to_string(),
        ];
        push_csv_record(&mut csv_content, &fields);
    }
    csv_content
}

// Commas, quotes and newlines force quoting; quotes are doubled
fn push_csv_record(out: &mut String, fields: &[String]) {
    for (i, value) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            let escaped = value.replace('"', "\"\"");
            out.push_str(&format!("\"{}\"", escaped));
        } else {
            out.push_str(value);
        }
    }
    out.push('\n');
}

/// Both tables as an XLSX workbook with one worksheet each
///
/// The `Scores` sheet mirrors the score view: final scores use a one-decimal
/// number format and rows with a zero validation get a red background. The
/// `Unmet Criteria` sheet keeps each cell's type.
///
/// # Arguments
/// * `scores` - Rows of the score table
/// * `criteria` - Rows of the failing-criteria table
///
/// # Returns
/// * A Result containing the xlsx file as bytes or an error
///
/// # Errors
/// * `Export` if rust_xlsxwriter cannot build the workbook
///
/// # Examples
/// ```
/// use eor_dashboard::downloader::tables_to_xlsx;
///
/// let bytes = tables_to_xlsx(&[], &[]).unwrap();
/// // xlsx files are zip archives
/// assert_eq!(&bytes[..2], b"PK");
/// ```
#[cfg(feature = "web")]
pub fn tables_to_xlsx(scores: &[ScoreRow], criteria: &[CriteriaRow]) -> Result<Vec<u8>> {
    use crate::cell::CellValue;
    use rust_xlsxwriter::{Color, Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let one_decimal = Format::new().set_num_format("0.0");
    let highlight = Format::new().set_background_color(Color::Red);

    let sheet = workbook.add_worksheet();
    sheet.set_name("Scores")?;
    for (c, header) in ["EOR Method", "Validation", "Final Score"].iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *header, &bold)?;
    }
    for (i, row) in scores.iter().enumerate() {
        let r = (i + 1) as u32;
        let highlighted = row.validation == Some(0.0);
        let text_format = if highlighted { highlight.clone() } else { Format::new() };
        let score_format = if highlighted {
            one_decimal.clone().set_background_color(Color::Red)
        } else {
            one_decimal.clone()
        };
        sheet.write_string_with_format(r, 0, &row.method, &text_format)?;
        if let Some(v) = row.validation {
            sheet.write_number_with_format(r, 1, v, &text_format)?;
        }
        if let Some(v) = row.final_score {
            sheet.write_number_with_format(r, 2, v, &score_format)?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Unmet Criteria")?;
    for (c, header) in ["EOR Method", "Criterion", "Value", "Meets"].iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *header, &bold)?;
    }
    for (i, row) in criteria.iter().enumerate() {
        let r = (i + 1) as u32;
        for (c, cell) in [&row.method, &row.criterion, &row.value].into_iter().enumerate() {
            match cell {
                CellValue::Number(n) if !n.is_nan() => {
                    sheet.write_number(r, c as u16, *n)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c as u16, *b)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(r, c as u16, s)?;
                }
                _ => {}
            }
        }
        sheet.write_string(r, 3, row.status)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_fields_with_commas() {
        let rows = vec![ScoreRow {
            method: "CO2, miscible".to_string(),
            validation: Some(1.0),
            final_score: Some(8.0),
        }];
        assert_eq!(
            scores_to_csv(&rows),
            "EOR Method,Validation,Final Score\n\"CO2, miscible\",1,8.0\n"
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let file = DownloadFile::locate("definitely/not/here.xlsx");
        assert!(!file.is_available());
        assert!(matches!(
            file.read(),
            Err(DashboardError::MissingOptionalFile { .. })
        ));
    }
}
