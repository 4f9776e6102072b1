//! CSV row source

use crate::types::{CellValue, RawRow, Result, SalesError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::RowSource;

/// Loads header-keyed rows from CSV files.
///
/// Cells are kept as text so numeric coercion happens in one place, the
/// sanitizer. Empty cells become `Null`; blank lines are skipped.
pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }

    /// Read rows from any reader (first line is the header).
    ///
    /// Cells that are not valid UTF-8 (e.g. cp1252 exports) are decoded
    /// lossily so a single bad byte never drops the file.
    pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .byte_headers()
            .map_err(|e| SalesError::Parse(format!("CSV header error: {}", e)))?
            .iter()
            .map(decode)
            .collect();

        let mut rows = Vec::new();
        for (index, result) in csv_reader.byte_records().enumerate() {
            let record = result.map_err(|e| {
                let line = e.position().map_or(index as u64 + 2, |p| p.line());
                SalesError::Parse(format!("CSV parse error at line {}: {}", line, e))
            })?;

            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .map(|(field, cell)| {
                    let value = if cell.is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::Text(decode(cell))
                    };
                    (field.clone(), value)
                })
                .collect();
            rows.push(row);
        }

        Ok(rows)
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn load(&self, path: &Path) -> Result<Vec<RawRow>> {
        let file = File::open(path)?;
        Self::read_rows(file).map_err(|e| match e {
            SalesError::Parse(msg) => SalesError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }
}
