use crate::record::{ProcessRecord, SheetJson};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::warn;
use wafertally_sheet::{CellValue, Sheet};

/// Shared-field labels recognized in header row 0.
const WAFER_ID_LABEL: &str = "WaferID";
const LINE_LABEL: &str = "线别";
const DEFECT_LABEL: &str = "不良项";

/// Configuration for header recognition and device-id inference.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// Row-0 labels that never start a process of their own.
    pub excluded_processes: HashSet<String>,
    /// Substrings that mark a sub-field as carrying the device identifier.
    pub device_id_markers: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            excluded_processes: ["SE激光", "丝网印刷"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            device_id_markers: vec!["设备".to_string(), "ID".to_string()],
        }
    }
}

impl SchemaConfig {
    /// Whether a sub-field name carries the device identifier.
    #[must_use]
    pub fn is_device_id_field(&self, field: &str) -> bool {
        self.device_id_markers
            .iter()
            .any(|marker| field.contains(marker.as_str()))
    }
}

/// Columns owned by one process: where its field block starts and the
/// sub-field names read from header row 1, in column order.
#[derive(Debug)]
struct ProcessColumns {
    start_col: usize,
    fields: Vec<String>,
}

/// Scanner state: either between processes or extending the field list of
/// the most recently opened one.
#[derive(Debug, PartialEq)]
enum ScanState {
    Idle,
    InProcess(String),
}

/// Accumulator threaded through the left-to-right header scan.
#[derive(Debug)]
struct HeaderScan {
    wafer_col: Option<usize>,
    line_col: Option<usize>,
    defect_col: Option<usize>,
    state: ScanState,
    processes: IndexMap<String, ProcessColumns>,
}

impl HeaderScan {
    fn new() -> Self {
        HeaderScan {
            wafer_col: None,
            line_col: None,
            defect_col: None,
            state: ScanState::Idle,
            processes: IndexMap::new(),
        }
    }

    /// Apply one column of the two header rows.
    ///
    /// Transition rules:
    /// - a shared-field label claims the column and closes any open process;
    /// - a non-excluded process label with a sub-label opens (or re-enters)
    ///   that process, registering it on first sight;
    /// - anything else with a sub-label extends the open process's fields.
    ///   This includes excluded process labels: their columns fold into the
    ///   surrounding process rather than starting their own.
    fn step(mut self, col: usize, label: &str, sub_label: &str, config: &SchemaConfig) -> Self {
        if label == WAFER_ID_LABEL || label == LINE_LABEL || label == DEFECT_LABEL {
            match label {
                WAFER_ID_LABEL => self.wafer_col = Some(col),
                LINE_LABEL => self.line_col = Some(col),
                _ => self.defect_col = Some(col),
            }
            self.state = ScanState::Idle;
        } else if !label.is_empty() && !config.excluded_processes.contains(label) {
            // A process label with an empty sub-label row is ignored and the
            // previous state stays in effect.
            if !sub_label.is_empty() {
                self.processes
                    .entry(label.to_string())
                    .or_insert_with(|| ProcessColumns {
                        start_col: col,
                        fields: vec![sub_label.to_string()],
                    });
                self.state = ScanState::InProcess(label.to_string());
            }
        } else if let ScanState::InProcess(name) = &self.state {
            if !sub_label.is_empty() {
                if let Some(info) = self.processes.get_mut(name) {
                    info.fields.push(sub_label.to_string());
                }
            }
        }
        self
    }
}

/// Fold the two header rows into column assignments.
fn scan_headers(sheet: &Sheet, config: &SchemaConfig) -> HeaderScan {
    (0..sheet.col_count()).fold(HeaderScan::new(), |scan, col| {
        let label = sheet.cell(0, col).as_trimmed();
        let sub_label = sheet.cell(1, col).as_trimmed();
        scan.step(col, &label, &sub_label, config)
    })
}

fn shared_value(sheet: &Sheet, row: usize, col: Option<usize>) -> String {
    col.map(|c| sheet.cell(row, c).as_trimmed())
        .unwrap_or_default()
}

/// Reconstruct per-process records from a raw sheet.
///
/// Rows 0 and 1 form the header block (row 0: shared-field labels and
/// process names, row 1: sub-field names); rows 2.. are data. Returns an
/// empty mapping when the sheet is too short or when neither the WaferID
/// column nor the defect column can be located — both are "nothing to
/// parse" conditions, not errors.
#[must_use]
pub fn sheet_to_records(sheet: &Sheet, config: &SchemaConfig) -> SheetJson {
    let mut result = SheetJson::new();

    if sheet.row_count() < 3 {
        warn!(
            sheet = sheet.name(),
            rows = sheet.row_count(),
            "not enough rows to extract process records"
        );
        return result;
    }

    let scan = scan_headers(sheet, config);

    if scan.wafer_col.is_none() && scan.defect_col.is_none() {
        warn!(
            sheet = sheet.name(),
            "neither a WaferID column nor a 不良项 column was found"
        );
        return result;
    }

    // Processes are present in the output even when no row carries data for
    // them, in registration order.
    for name in scan.processes.keys() {
        result.insert(name.clone(), Vec::new());
    }

    for row_idx in 2..sheet.row_count() {
        let wafer_id = shared_value(sheet, row_idx, scan.wafer_col);
        let line = shared_value(sheet, row_idx, scan.line_col);
        let defect = shared_value(sheet, row_idx, scan.defect_col);

        for (process, info) in &scan.processes {
            let mut record =
                ProcessRecord::shared(wafer_id.clone(), line.clone(), defect.clone());
            let mut has_data = !record.wafer_id.is_empty() || !record.defect.is_empty();

            for (i, field) in info.fields.iter().enumerate() {
                let cell = sheet.cell(row_idx, info.start_col + i);

                if config.is_device_id_field(field) {
                    record.device_id = cell.as_trimmed();
                }
                if !cell.is_blank() {
                    has_data = true;
                }

                let value = if cell.is_blank() {
                    CellValue::Null
                } else {
                    cell.clone()
                };
                record.fields.insert(field.clone(), value);
            }

            // No explicit device field matched (or it was blank): fall back
            // to the first field of the process.
            if record.device_id.is_empty() {
                if let Some(first) = info.fields.first() {
                    if let Some(value) = record.fields.get(first) {
                        let trimmed = value.as_trimmed();
                        if !trimmed.is_empty() {
                            record.device_id = trimmed;
                        }
                    }
                }
            }

            if has_data {
                if let Some(records) = result.get_mut(process) {
                    records.push(record);
                }
            }
        }
    }

    result
}
