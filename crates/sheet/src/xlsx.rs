use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Column width applied to every exported column (matches the fixed width
/// the result grids have always been published with).
const EXPORT_COLUMN_WIDTH: f64 = 15.0;

fn workbook_err<E: std::fmt::Display>(e: E) -> SheetError {
    SheetError::Workbook(e.to_string())
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as day counts since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn range_to_rows(range: &calamine::Range<Data>) -> Vec<Vec<CellValue>> {
    range
        .rows()
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect()
}

impl Sheet {
    /// Load a sheet from an Excel file (first sheet)
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;

        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Ok(Sheet::new());
        }

        Self::from_xlsx_sheet(path, &sheet_names[0])
    }

    /// Load a specific sheet from an Excel file by name
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(workbook_err)?;

        let mut sheet = Sheet::with_name(sheet_name);
        *sheet.data_mut() = range_to_rows(&range);
        Ok(sheet)
    }

    /// Save the sheet to an Excel file
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        write_to_worksheet(self, worksheet)?;

        workbook.save(path.as_ref()).map_err(workbook_err)?;
        Ok(())
    }
}

/// Write sheet data (and the fixed column widths) to a worksheet
fn write_to_worksheet(sheet: &Sheet, worksheet: &mut Worksheet) -> Result<()> {
    worksheet.set_name(sheet.name()).map_err(workbook_err)?;

    for (row_idx, row) in sheet.data().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?;
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(workbook_err)?;
                }
                CellValue::Int(i) => {
                    // Note: Excel stores all numbers as f64, so integers > 2^53
                    // may lose precision
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(workbook_err)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(workbook_err)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(workbook_err)?;
                }
            }
        }
    }

    for col in 0..sheet.col_count() {
        let col_num = u16::try_from(col)
            .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;
        worksheet
            .set_column_width(col_num, EXPORT_COLUMN_WIDTH)
            .map_err(workbook_err)?;
    }

    Ok(())
}

impl Book {
    /// Load a book from an Excel file (all sheets, in workbook order)
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut book = Book::new();

        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(workbook_err)?;

            let mut sheet = Sheet::with_name(&sheet_name);
            *sheet.data_mut() = range_to_rows(&range);
            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Save the book to an Excel file
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();

        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_to_worksheet(sheet, worksheet)?;
        }

        workbook.save(path.as_ref()).map_err(workbook_err)?;
        Ok(())
    }

    /// Get sheet names from an Excel file without loading data
    pub fn xlsx_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_err)?;

        Ok(workbook.sheet_names().to_vec())
    }
}
