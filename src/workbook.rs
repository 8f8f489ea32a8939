use crate::cell::CellValue;
use crate::error::{DashboardError, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::ops;
use std::path::{Path, PathBuf};

/// Read-only handle on the source workbook
///
/// The handle is acquired with [`Workbook::open`] and released when dropped.
/// Callers are expected to load everything they need and let it go out of
/// scope; nothing is ever written back.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook (xlsx, xlsm, xlsb, xls or ods)
    ///
    /// # Errors
    /// * `WorkbookNotFound` if nothing exists at `path`
    /// * `Workbook` if the file cannot be parsed as a spreadsheet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DashboardError::WorkbookNotFound { path });
        }

        let sheets = open_workbook_auto(&path).map_err(|source| DashboardError::Workbook {
            path: path.clone(),
            source,
        })?;

        log::info!("opened workbook {}", path.display());
        Ok(Workbook { path, sheets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Read one named sheet into a [`SheetGrid`]
    pub fn sheet(&mut self, name: &str) -> Result<SheetGrid> {
        if !self.sheet_names().iter().any(|s| s == name) {
            return Err(DashboardError::SheetNotFound {
                sheet: name.to_string(),
            });
        }

        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| DashboardError::Workbook {
                path: self.path.clone(),
                source,
            })?;

        let grid = SheetGrid::from_range(name, &range);
        log::debug!(
            "sheet '{}': {} rows x {} columns below the header",
            name,
            grid.height(),
            grid.width()
        );
        Ok(grid)
    }
}

impl Drop for Workbook {
    fn drop(&mut self) {
        log::info!("released workbook {}", self.path.display());
    }
}

/// A sheet read as a frame: the first spreadsheet row is the header, data
/// rows follow. Positions are absolute, so column 0 is always column A and
/// frame row 0 is always spreadsheet row 2, whatever the used range is.
#[derive(Clone, Debug)]
pub struct SheetGrid {
    name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl SheetGrid {
    /// Build a grid from calamine's used range
    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let (height, width) = match range.end() {
            Some((last_row, last_col)) => (last_row as usize, last_col as usize + 1),
            None => (0, 0),
        };

        let rows = (0..height)
            .map(|r| {
                (0..width)
                    .map(|c| {
                        range
                            .get_value(((r + 1) as u32, c as u32))
                            .map(cell_value)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        SheetGrid {
            name: name.to_string(),
            rows,
            width,
        }
    }

    /// Build a grid from data rows already below the header
    pub fn from_rows(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        SheetGrid {
            name: name.to_string(),
            rows,
            width,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data rows below the header
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// One past the last used column
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }

    /// Positional slice of `rows` x `cols`.
    ///
    /// Rows past the end are dropped silently; a column past the width is an
    /// error.
    pub fn select(&self, rows: ops::Range<usize>, cols: &[usize]) -> Result<Vec<Vec<CellValue>>> {
        if let Some(&column) = cols.iter().find(|&&c| c >= self.width) {
            return Err(DashboardError::ColumnOutOfBounds {
                sheet: self.name.clone(),
                column,
                width: self.width,
            });
        }

        let end = rows.end.min(self.height());
        let start = rows.start.min(end);
        Ok((start..end)
            .map(|r| cols.iter().map(|&c| self.cell(r, c)).collect())
            .collect())
    }

    /// Every row, restricted to `cols`
    pub fn select_columns(&self, cols: &[usize]) -> Result<Vec<Vec<CellValue>>> {
        self.select(0..self.height(), cols)
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::text(s.as_str()),
        // #DIV/0!, #REF!, #VALUE! and friends carry no value
        Data::Error(_) => CellValue::Missing,
        other => CellValue::text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_criteria, load_scores};
    use calamine::CellErrorType;

    fn grid() -> SheetGrid {
        SheetGrid::from_rows(
            "Ui",
            vec![
                vec!["a".into(), 1.into(), 2.into()],
                vec!["b".into(), 3.into()],
            ],
        )
    }

    #[test]
    fn select_truncates_rows_past_the_end() {
        let rows = grid().select(1..10, &[0, 1]).unwrap();
        assert_eq!(rows, vec![vec![CellValue::text("b"), CellValue::Number(3.0)]]);
    }

    #[test]
    fn select_pads_short_rows_with_missing() {
        let rows = grid().select(0..2, &[2]).unwrap();
        assert_eq!(rows[1][0], CellValue::Missing);
    }

    #[test]
    fn select_rejects_columns_past_the_width() {
        let err = grid().select(0..2, &[0, 3]).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnOutOfBounds { column: 3, width: 3, .. }));
    }

    #[test]
    fn empty_range_has_no_columns() {
        let range: Range<Data> = Range::empty();
        let grid = SheetGrid::from_range("Empty", &range);
        assert_eq!(grid.height(), 0);
        assert_eq!(grid.width(), 0);
    }

    #[test]
    fn error_cells_are_missing() {
        // Score block starts at spreadsheet row 55, criteria at row 1
        let mut ui: Range<Data> = Range::new((0, 0), (56, 21));
        ui.set_value((55, 19), Data::String("Polymer".to_string()));
        ui.set_value((55, 20), Data::Float(1.0));
        ui.set_value((55, 21), Data::Error(CellErrorType::Div0));
        ui.set_value((56, 19), Data::String("CO2".to_string()));
        ui.set_value((56, 20), Data::Error(CellErrorType::Value));
        ui.set_value((56, 21), Data::Float(6.0));

        let mut tabla: Range<Data> = Range::new((0, 0), (1, 11));
        tabla.set_value((1, 1), Data::String("Polymer".to_string()));
        tabla.set_value((1, 2), Data::Error(CellErrorType::Ref));
        tabla.set_value((1, 11), Data::Float(0.0));

        let ui = SheetGrid::from_range("Ui", &ui);
        assert_eq!(ui.cell(54, 21), CellValue::Missing);
        assert_eq!(ui.cell(55, 20), CellValue::Missing);
        assert!(load_scores(&ui).unwrap().is_empty());

        let tabla = SheetGrid::from_range("Tabla_Puntaje", &tabla);
        assert_eq!(tabla.cell(0, 2), CellValue::Missing);
        assert!(load_criteria(&tabla).unwrap().is_empty());
    }
}
