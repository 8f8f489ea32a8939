use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the workbook, rendering or exporting
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("workbook not found: {}", path.display())]
    WorkbookNotFound { path: PathBuf },

    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found in workbook")]
    SheetNotFound { sheet: String },

    #[error("column {column} is out of bounds for sheet '{sheet}' ({width} columns)")]
    ColumnOutOfBounds {
        sheet: String,
        column: usize,
        width: usize,
    },

    #[error("file not found: {}", path.display())]
    MissingOptionalFile { path: PathBuf },

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[cfg(feature = "web")]
    #[error("xlsx export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Whether this error comes from loading the workbook and must stop the process
    pub fn is_fatal_load(&self) -> bool {
        matches!(
            self,
            DashboardError::WorkbookNotFound { .. }
                | DashboardError::Workbook { .. }
                | DashboardError::SheetNotFound { .. }
                | DashboardError::ColumnOutOfBounds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
