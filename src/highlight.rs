use crate::loader::ScoreRow;

/// Number of cells a score row is displayed with
pub const SCORE_ROW_WIDTH: usize = 3;

/// Display style of one table cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Highlight,
}

impl CellStyle {
    /// Inline CSS for the cell
    pub fn css(self) -> &'static str {
        match self {
            CellStyle::Plain => "",
            CellStyle::Highlight => "background-color: red",
        }
    }
}

/// Whole-row highlight for methods whose validation is exactly zero
pub fn highlight_row(row: &ScoreRow) -> [CellStyle; SCORE_ROW_WIDTH] {
    let style = if row.validation == Some(0.0) {
        CellStyle::Highlight
    } else {
        CellStyle::Plain
    };
    [style; SCORE_ROW_WIDTH]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(validation: Option<f64>) -> ScoreRow {
        ScoreRow {
            method: "Polymer".to_string(),
            validation,
            final_score: Some(7.4),
        }
    }

    #[test]
    fn zero_validation_highlights_every_cell() {
        assert_eq!(highlight_row(&row(Some(0.0))), [CellStyle::Highlight; 3]);
    }

    #[test]
    fn other_validations_stay_plain() {
        for v in [Some(1.0), Some(0.01), Some(-0.5), None] {
            assert_eq!(highlight_row(&row(v)), [CellStyle::Plain; 3]);
        }
    }
}
