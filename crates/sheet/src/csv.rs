use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

impl Sheet {
    /// Load a sheet from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Load a sheet from a CSV file with custom options
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Self::from_csv_reader(reader, options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), CsvOptions::default())
    }

    /// Load a sheet from a reader
    pub fn from_csv_reader<R: Read>(reader: R, options: CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false) // The grid keeps every row; headers are data
            .flexible(true)
            .from_reader(reader);

        let mut data: Vec<Vec<CellValue>> = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if options.infer_types {
                        CellValue::parse(field)
                    } else {
                        CellValue::String(field.to_string())
                    }
                })
                .collect();
            data.push(row);
        }

        let mut sheet = Sheet::with_name("Sheet1");
        *sheet.data_mut() = data;
        Ok(sheet)
    }

    /// Save the sheet to a CSV file.
    ///
    /// The file starts with a UTF-8 BOM; without it Excel assumes a legacy
    /// codepage and garbles the Chinese header labels.
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_as_csv_with_options(path, CsvOptions::default())
    }

    /// Save the sheet to a CSV file with custom options
    pub fn save_as_csv_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        options: CsvOptions,
    ) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all("\u{feff}".as_bytes())?;
        self.write_csv(writer, options)
    }

    /// Write the sheet to a writer as CSV
    pub fn write_csv<W: Write>(&self, writer: W, options: CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .from_writer(writer);

        for row in self.data() {
            let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the sheet to a CSV string
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut buffer = Vec::new();
        // Ignore errors for string conversion
        let _ = self.write_csv(&mut buffer, CsvOptions::default());
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_csv_str() {
        let csv = "WaferID,线别,不良项\nW1,L1,脏污\nW2,L2,划伤";
        let sheet = Sheet::from_csv_str(csv).unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(
            sheet.get(1, 2).unwrap(),
            &CellValue::String("脏污".to_string())
        );
    }

    #[test]
    fn test_type_inference() {
        let csv = "string,int,float,bool,empty\nhello,42,2.5,true,";
        let sheet = Sheet::from_csv_str(csv).unwrap();

        assert_eq!(
            sheet.get(1, 0).unwrap(),
            &CellValue::String("hello".to_string())
        );
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::Int(42));
        assert_eq!(sheet.get(1, 2).unwrap(), &CellValue::Float(2.5));
        assert_eq!(sheet.get(1, 3).unwrap(), &CellValue::Bool(true));
        assert_eq!(sheet.get(1, 4).unwrap(), &CellValue::Null);
    }

    #[test]
    fn test_ragged_csv_rows() {
        let csv = "a,b,c\nd\ne,f";
        let sheet = Sheet::from_csv_str(csv).unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.col_count(), 3);
        assert!(sheet.cell(1, 1).is_null());
    }

    #[test]
    fn test_to_csv_string_quotes_special_chars() {
        let sheet = Sheet::from_data(vec![
            vec!["plain", "with,comma"],
            vec!["with\"quote", "with\nnewline"],
        ]);

        let csv = sheet.to_csv_string();
        assert!(csv.contains("\"with,comma\""));
        assert!(csv.contains("\"with\"\"quote\""));
        assert!(csv.contains("\"with\nnewline\""));
    }

    #[test]
    fn test_csv_roundtrip() {
        let original = Sheet::from_data(vec![vec!["设备ID", "数量"], vec!["D1", "5"]]);

        let csv = original.to_csv_string();
        let restored = Sheet::from_csv_str(&csv).unwrap();

        assert_eq!(original.row_count(), restored.row_count());
        assert_eq!(original.col_count(), restored.col_count());
    }

    #[test]
    fn test_save_writes_bom() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.csv");

        let sheet = Sheet::from_data(vec![vec!["设备ID", "数量"]]);
        sheet.save_as_csv(&file_path).unwrap();

        let bytes = std::fs::read(&file_path).unwrap();
        assert_eq!(&bytes[..3], [0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_tsv() {
        let sheet = Sheet::from_data(vec![vec!["a", "b"]]);
        let mut buffer = Vec::new();
        sheet.write_csv(&mut buffer, CsvOptions::tsv()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a\tb\n");
    }
}
