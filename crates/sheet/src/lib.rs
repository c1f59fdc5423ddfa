//! Grid container for wafertally
//!
//! A `Sheet` is one named 2D grid of cells as decoded from a workbook; a
//! `Book` is an ordered collection of sheets. This crate is the I/O boundary
//! of the defect-tally pipeline: it reads `.xlsx` workbooks into raw cell
//! grids and writes result grids back out as CSV, JSON, or `.xlsx`.
//!
//! Grids are ragged: rows keep whatever length the source file gave them,
//! and cells past the end of a short row read as [`CellValue::Null`].
//!
//! # Examples
//!
//! ```
//! use wafertally_sheet::{CellValue, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["WaferID", "线别"],
//!     vec!["W-001", "L1", "extra"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.col_count(), 3); // widest row wins
//! assert!(sheet.cell(0, 2).is_null()); // short row reads as Null
//! ```
//!
//! ## Loading a workbook
//!
//! ```no_run
//! use wafertally_sheet::Book;
//!
//! let book = Book::from_xlsx("defects.xlsx").unwrap();
//! for (name, sheet) in book.sheets() {
//!     println!("{name}: {} rows", sheet.row_count());
//! }
//! ```

mod book;
mod cell;
mod csv;
mod error;
mod json;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
