//! JSON export for Sheet
//!
//! Writes a sheet as an array of objects: the first row supplies the keys,
//! every following row becomes one object. A blank header cell is keyed
//! `Column{n}` (1-based) so no value is dropped.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl Sheet {
    /// Save the sheet to a JSON file as an array of objects
    pub fn save_as_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_json(writer, false)
    }

    /// Save the sheet to a JSON file as a pretty-printed array of objects
    pub fn save_as_json_pretty<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_json(writer, true)
    }

    /// Write the sheet to a writer as JSON
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let headers: Vec<String> = self
            .row(0)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let label = cell.as_str();
                        if label.is_empty() {
                            format!("Column{}", i + 1)
                        } else {
                            label
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let json_array: Vec<Map<String, Value>> = self
            .rows()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, key)| {
                        let cell = row.get(i).unwrap_or(&CellValue::Null);
                        (key.clone(), cell_to_json_value(cell))
                    })
                    .collect()
            })
            .collect();

        if pretty {
            serde_json::to_writer_pretty(writer, &json_array)
                .map_err(|e| SheetError::Serialize(format!("JSON write error: {e}")))?;
        } else {
            serde_json::to_writer(writer, &json_array)
                .map_err(|e| SheetError::Serialize(format!("JSON write error: {e}")))?;
        }

        Ok(())
    }

    /// Convert the sheet to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer, false)?;
        // Safe: serde_json always outputs valid UTF-8
        Ok(String::from_utf8(buffer).expect("JSON output is always valid UTF-8"))
    }
}

/// Convert a CellValue to a serde_json Value
fn cell_to_json_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => Value::Number((*i).into()),
        CellValue::Float(f) => {
            // from_f64 returns None for NaN and Infinity
            // Fall back to string representation to preserve data
            serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string()))
        }
        CellValue::String(s) => Value::String(s.clone()),
    }
}
