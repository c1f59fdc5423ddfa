//! Defect tally pipeline for wafertally
//!
//! Turns a raw production test grid into a per-device defect count table:
//!
//! 1. [`sheet_to_records`] reads the two-row header block and reconstructs
//!    one record per data row per process.
//! 2. [`filter_records`] keeps records matching the selected line and
//!    defect values.
//! 3. [`count_by_key`] tallies the surviving records per device.
//! 4. [`generate_sheet`] reflows the tallies into a padded display grid
//!    with a synthesized header row.
//!
//! Every stage is a pure function over immutable inputs; a stage that has
//! nothing to say returns an empty result instead of an error, and the
//! [`analyze_book`] driver skips such sheets with a warning so one bad
//! sheet never takes down the rest of the workbook.
//!
//! # Example
//!
//! ```
//! use wafertally_report::{analyze_sheet, FilterCriteria, SchemaConfig};
//! use wafertally_sheet::Sheet;
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["WaferID", "线别", "不良项", "制绒", ""],
//!     vec!["", "", "", "设备", "数量"],
//!     vec!["W1", "L1", "脏污", "ZR-01", "5"],
//! ]);
//!
//! let criteria = FilterCriteria::default(); // no restriction
//! let result = analyze_sheet(&sheet, &criteria, &SchemaConfig::default()).unwrap();
//! assert_eq!(result.row_count(), 2); // header + one device row
//! ```

mod filter;
mod pipeline;
mod record;
mod reflow;
mod schema;
mod tally;

/// Re-export filter criteria and the record filter.
pub use filter::{filter_records, FilterCriteria};
/// Re-export the workbook drivers.
pub use pipeline::{analyze_book, analyze_sheet, DEFAULT_TARGET_DEFECTS};
/// Re-export record types.
pub use record::{ProcessRecord, SheetJson};
/// Re-export the reflow engine.
pub use reflow::generate_sheet;
/// Re-export the schema extractor.
pub use schema::{sheet_to_records, SchemaConfig};
/// Re-export the tally helpers.
pub use tally::{count_by_key, device_key, GroupedCounts};
