//! Dense, absolutely addressed view of the first worksheet of a workbook.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::errors::ExtractionError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Blank cells and whitespace-only text count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual form, `None` when the cell is empty.
    ///
    /// Integral numbers render without a fractional part so numeric codes
    /// read back the way they were typed.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        }
    }

    /// Numeric value; text is parsed with a comma accepted as decimal separator.
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }

    /// [`Cell::number`] rounded to the nearest integer, ties to even.
    pub fn rounded(&self) -> Option<f64> {
        self.number()
            .filter(|n| n.is_finite())
            .map(f64::round_ties_even)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }
}

/// Row 0 is Excel row 1 and column 0 is column A, regardless of where the
/// used range starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Sheet { rows, width }
    }

    /// Reads the first worksheet of an `.xlsx`/`.xls` payload.
    pub fn from_workbook_bytes(bytes: &[u8]) -> Result<Sheet, ExtractionError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ExtractionError::Workbook(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ExtractionError::NoSheets)?
            .map_err(|e| ExtractionError::Workbook(e.to_string()))?;

        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut row = vec![Cell::Empty; col_offset];
            row.extend(data_row.iter().map(Cell::from));
            rows.push(row);
        }
        Ok(Sheet::from_rows(rows))
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        self.cell(row, col).text()
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |cells| cells.iter().all(Cell::is_empty))
    }

    /// Non-empty cells of a row with their column index.
    pub fn row_texts(&self, row: usize) -> Vec<(usize, String)> {
        (0..self.width)
            .filter_map(|col| self.text(row, col).map(|t| (col, t)))
            .collect()
    }
}
