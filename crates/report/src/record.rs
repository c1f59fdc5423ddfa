use indexmap::IndexMap;
use serde::Serialize;
use wafertally_sheet::CellValue;

/// One reconstructed row of shared + process-specific field values.
///
/// The shared identifying fields are always present (empty string when the
/// source cell was missing); the process-specific fields keep the column
/// order of the header block. `device_id` is derived during extraction and
/// is the key the tally stage groups on; empty means no device could be
/// inferred for the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    #[serde(rename = "WaferID")]
    pub wafer_id: String,
    #[serde(rename = "线别")]
    pub line: String,
    #[serde(rename = "不良项")]
    pub defect: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, CellValue>,
    #[serde(rename = "设备ID", skip_serializing_if = "String::is_empty")]
    pub device_id: String,
}

impl ProcessRecord {
    /// Create a record carrying only the shared fields.
    #[must_use]
    pub fn shared(wafer_id: String, line: String, defect: String) -> Self {
        ProcessRecord {
            wafer_id,
            line,
            defect,
            fields: IndexMap::new(),
            device_id: String::new(),
        }
    }
}

/// Extracted records per process, in process-registration order
/// (first column where each process header appears).
pub type SheetJson = IndexMap<String, Vec<ProcessRecord>>;
