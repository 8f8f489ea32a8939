use crate::cell::CellValue;
use crate::error::Result;
use crate::workbook::{SheetGrid, Workbook};
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

/// Sheet holding the final score of every EOR method
pub const SCORE_SHEET: &str = "Ui";
/// Frame rows of the score block
pub const SCORE_ROWS: Range<usize> = 54..63;
/// Frame columns of the score block: method, validation, final score
pub const SCORE_COLUMNS: [usize; 3] = [19, 20, 21];

/// Sheet holding the per-criterion screening results
pub const CRITERIA_SHEET: &str = "Tabla_Puntaje";
/// Frame columns of the criteria block: method, criterion, value, meets flag
pub const CRITERIA_COLUMNS: [usize; 4] = [1, 2, 9, 11];

/// Label written over the meets flag of every retained criteria row
pub const FAILING_LABEL: &str = "DOES NOT MEET";

/// Final score of one EOR method
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRow {
    pub method: String,
    pub validation: Option<f64>,
    /// Rounded to one decimal
    pub final_score: Option<f64>,
}

/// One screening criterion an EOR method fails
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriteriaRow {
    pub method: CellValue,
    pub criterion: CellValue,
    pub value: CellValue,
    pub status: &'static str,
}

/// Both tables, derived once from the workbook and never modified afterwards
#[derive(Clone, Debug, Default, Serialize)]
pub struct DashboardData {
    pub scores: Vec<ScoreRow>,
    pub criteria: Vec<CriteriaRow>,
}

/// Open the workbook, load both tables and release the handle.
///
/// # Errors
/// Any fatal load error: missing workbook, missing sheet, or a fixed column
/// outside the sheet.
pub fn load_dashboard_data(path: impl AsRef<Path>) -> Result<DashboardData> {
    let mut workbook = Workbook::open(path)?;
    let data = load_tables(&mut workbook)?;
    log::info!(
        "loaded {} score rows and {} failing criteria from {}",
        data.scores.len(),
        data.criteria.len(),
        workbook.path().display()
    );
    drop(workbook);
    Ok(data)
}

/// Load both tables from an already opened workbook
pub fn load_tables(workbook: &mut Workbook) -> Result<DashboardData> {
    let scores = load_scores(&workbook.sheet(SCORE_SHEET)?)?;
    let criteria = load_criteria(&workbook.sheet(CRITERIA_SHEET)?)?;
    Ok(DashboardData { scores, criteria })
}

/// Extract the score table from the `Ui` sheet
///
/// Takes frame rows [`SCORE_ROWS`] of columns [`SCORE_COLUMNS`], keeps the
/// rows where all three cells are present and coerces the two numeric
/// columns. Incomplete rows are dropped before numeric coercion, so a cell
/// holding unparseable text survives as a row with a missing number.
///
/// # Arguments
/// * `sheet` - The `Ui` sheet read as a frame
///
/// # Returns
/// * The complete score rows in sheet order, final score rounded to one decimal
///
/// # Errors
/// * `ColumnOutOfBounds` if the sheet is narrower than column 22
///
/// # Examples
/// ```
/// use eor_dashboard::CellValue;
/// use eor_dashboard::loader::load_scores;
/// use eor_dashboard::workbook::SheetGrid;
///
/// let mut rows = vec![vec![CellValue::Missing; 22]; 55];
/// rows[54][19] = "Polymer".into();
/// rows[54][20] = 0.into();
/// rows[54][21] = 7.46.into();
///
/// let scores = load_scores(&SheetGrid::from_rows("Ui", rows)).unwrap();
/// assert_eq!(scores[0].final_score, Some(7.5));
/// ```
pub fn load_scores(sheet: &SheetGrid) -> Result<Vec<ScoreRow>> {
    let block = sheet.select(SCORE_ROWS, &SCORE_COLUMNS)?;

    let rows: Vec<ScoreRow> = block
        .into_iter()
        .filter(|row| row.iter().all(|cell| !cell.is_missing()))
        .map(|row| ScoreRow {
            method: row[0].to_string(),
            validation: row[1].to_number(),
            final_score: row[2].to_number().map(round_one_decimal),
        })
        .collect();
    log::debug!("sheet '{}': {} complete score rows", sheet.name(), rows.len());
    Ok(rows)
}

/// Extract the failing criteria from the `Tabla_Puntaje` sheet
///
/// The method column is forward-filled over every row first. Rows are then
/// kept when the criterion is present and the meets flag equals numeric
/// zero; the flag is replaced by [`FAILING_LABEL`].
///
/// # Arguments
/// * `sheet` - The `Tabla_Puntaje` sheet read as a frame
///
/// # Returns
/// * One row per failing criterion, in sheet order
///
/// # Errors
/// * `ColumnOutOfBounds` if the sheet is narrower than column 12
///
/// # Examples
/// ```
/// use eor_dashboard::CellValue;
/// use eor_dashboard::loader::load_criteria;
/// use eor_dashboard::workbook::SheetGrid;
///
/// let mut rows = vec![vec![CellValue::Missing; 12]; 2];
/// rows[0][1] = "Polymer".into();
/// rows[0][2] = "Viscosity".into();
/// rows[0][11] = 1.into();
/// rows[1][2] = "Depth".into();
/// rows[1][11] = 0.into();
///
/// let criteria = load_criteria(&SheetGrid::from_rows("Tabla_Puntaje", rows)).unwrap();
/// assert_eq!(criteria.len(), 1);
/// assert_eq!(criteria[0].method, CellValue::text("Polymer"));
/// ```
pub fn load_criteria(sheet: &SheetGrid) -> Result<Vec<CriteriaRow>> {
    let block = sheet.select_columns(&CRITERIA_COLUMNS)?;

    let mut methods: Vec<CellValue> = block.iter().map(|row| row[0].clone()).collect();
    forward_fill(&mut methods);

    let rows: Vec<CriteriaRow> = block
        .into_iter()
        .zip(methods)
        .filter(|(row, _)| !row[1].is_missing())
        .filter(|(row, _)| row[3].equals_zero())
        .map(|(mut row, method)| CriteriaRow {
            method,
            criterion: std::mem::take(&mut row[1]),
            value: std::mem::take(&mut row[2]),
            status: FAILING_LABEL,
        })
        .collect();
    log::debug!("sheet '{}': {} failing criteria", sheet.name(), rows.len());
    Ok(rows)
}

/// Replace every missing value with the nearest preceding non-missing one.
/// Leading missing values stay missing.
pub fn forward_fill(values: &mut [CellValue]) {
    let mut last: Option<CellValue> = None;
    for value in values.iter_mut() {
        if value.is_missing() {
            if let Some(prev) = &last {
                *value = prev.clone();
            }
        } else {
            last = Some(value.clone());
        }
    }
}

/// Round to one decimal, ties to even on the scaled value
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_half_even() {
        assert_eq!(round_one_decimal(7.42), 7.4);
        assert_eq!(round_one_decimal(7.46), 7.5);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(-1.0), -1.0);
    }

    #[test]
    fn forward_fill_keeps_leading_gaps() {
        let mut values = vec![
            CellValue::Missing,
            "Polymer".into(),
            CellValue::Missing,
            "CO2".into(),
            CellValue::Missing,
        ];
        forward_fill(&mut values);
        assert_eq!(
            values,
            vec![
                CellValue::Missing,
                "Polymer".into(),
                "Polymer".into(),
                "CO2".into(),
                "CO2".into(),
            ]
        );
    }
}
