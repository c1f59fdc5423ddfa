use crate::cell::CellValue;
use crate::error::{Result, SheetError};

const NULL_CELL: CellValue = CellValue::Null;

/// A sheet representing a 2D grid of cells (row-major storage)
///
/// Rows are ragged: each row keeps the length the source gave it, and
/// `col_count` is the width of the widest row. Reading a cell past the end
/// of a short row yields `Null` rather than an error; decoded workbooks
/// routinely drop trailing empty cells and downstream stages must not care.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            data: converted,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a cell value, treating missing cells as `Null`.
    ///
    /// Any position outside the stored grid (short row, or row/column beyond
    /// the data) reads as `Null`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL_CELL)
    }

    /// Get a cell value by row and column index (0-based), strict bounds
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        if row >= self.row_count() || col >= self.col_count() {
            return Err(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            });
        }
        Ok(self.cell(row, col))
    }

    /// Get an entire row by index, if present
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Vec<CellValue>> {
        self.data.get(index)
    }

    /// Append a row to the end of the sheet
    pub fn push_row<T: Into<CellValue>>(&mut self, row: Vec<T>) {
        self.data.push(row.into_iter().map(Into::into).collect());
    }

    /// Get rows iterator
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable internal data reference
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data() {
        let sheet = Sheet::from_data(vec![vec![1, 2, 3], vec![4, 5, 6]]);

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(sheet.get(1, 2).unwrap(), &CellValue::Int(6));
    }

    #[test]
    fn test_ragged_rows() {
        let sheet = Sheet::from_data(vec![
            vec!["a", "b"],
            vec!["c", "d", "e", "f"],
            vec!["g"],
        ]);

        // Widest row defines the column count
        assert_eq!(sheet.col_count(), 4);

        // Short rows read as Null past their end
        assert_eq!(sheet.cell(0, 3), &CellValue::Null);
        assert_eq!(sheet.cell(2, 1), &CellValue::Null);
        assert_eq!(sheet.cell(1, 3), &CellValue::String("f".to_string()));
    }

    #[test]
    fn test_cell_out_of_grid_is_null() {
        let sheet = Sheet::from_data(vec![vec![1]]);
        assert!(sheet.cell(10, 10).is_null());
    }

    #[test]
    fn test_get_strict_bounds() {
        let sheet = Sheet::from_data(vec![vec![1, 2]]);

        assert!(sheet.get(0, 1).is_ok());
        assert!(matches!(
            sheet.get(1, 0),
            Err(SheetError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_push_row() {
        let mut sheet = Sheet::with_name("result");
        sheet.push_row(vec!["设备ID", "数量"]);
        sheet.push_row(vec!["D1", "5"]);

        assert_eq!(sheet.name(), "result");
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.col_count(), 0);
    }
}
