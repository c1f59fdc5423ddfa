use crate::filter::{filter_records, FilterCriteria};
use crate::reflow::generate_sheet;
use crate::schema::{sheet_to_records, SchemaConfig};
use crate::tally::{count_by_key, device_key, GroupedCounts};
use tracing::warn;
use wafertally_sheet::{Book, Sheet};

/// Defect values preselected in the viewer when the user has not picked any.
pub const DEFAULT_TARGET_DEFECTS: [&str; 2] = ["脏污", "划伤"];

/// Run the full pipeline over one sheet.
///
/// Returns `None` when any stage comes up empty — too few rows, no
/// recognizable header block, nothing surviving the filter, or an empty
/// result grid. Each such case is a warning, not an error; the caller
/// simply has nothing to show for this sheet.
#[must_use]
pub fn analyze_sheet(
    sheet: &Sheet,
    criteria: &FilterCriteria,
    config: &SchemaConfig,
) -> Option<Sheet> {
    if sheet.row_count() < 3 {
        warn!(sheet = sheet.name(), "sheet has no data rows, skipping");
        return None;
    }

    let records = sheet_to_records(sheet, config);
    if records.is_empty() {
        warn!(sheet = sheet.name(), "no process records extracted, skipping");
        return None;
    }

    let filtered = filter_records(&records, criteria);
    if filtered.values().all(Vec::is_empty) {
        warn!(sheet = sheet.name(), "no records left after filtering, skipping");
        return None;
    }

    let counted: Vec<GroupedCounts> = filtered
        .values()
        .map(|records| count_by_key(records, device_key))
        .collect();

    let generated = generate_sheet(&counted, sheet.name());
    if generated.is_empty() {
        None
    } else {
        Some(generated)
    }
}

/// Run the pipeline over every sheet of a workbook.
///
/// Sheets are processed independently: one sheet yielding nothing (or
/// having a malformed layout) never stops the others. The output keeps the
/// workbook's sheet order.
#[must_use]
pub fn analyze_book(book: &Book, criteria: &FilterCriteria, config: &SchemaConfig) -> Vec<Sheet> {
    book.sheets()
        .filter_map(|(_, sheet)| analyze_sheet(sheet, criteria, config))
        .collect()
}
