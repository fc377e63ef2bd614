//! Shared plumbing for the tabular validators (array intensities and
//! count matrices): delimiter inference and csv-backed row iteration.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SeqgateError};

/// Infer the delimiter from the header line: tab wins over comma.
///
/// The tabular formats this crate accepts are tab-delimited by convention,
/// with comma-separated exports tolerated.
pub fn detect_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path).map_err(|e| SeqgateError::io(path, e))?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|e| SeqgateError::io(path, e))?;

    if first_line.contains('\t') {
        Ok(b'\t')
    } else {
        Ok(b',')
    }
}

/// Read only the header row. Cheap enough for sniffing.
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let delimiter = detect_delimiter(path)?;
    let file = File::open(path).map_err(|e| SeqgateError::io(path, e))?;
    let mut reader = reader_builder(delimiter).from_reader(file);

    let header = reader.headers()?.iter().map(|s| s.to_string()).collect();
    Ok(header)
}

/// Streaming reader over a delimited file, header consumed up front.
pub struct TabularReader {
    header: Vec<String>,
    reader: csv::Reader<File>,
}

impl TabularReader {
    /// Open a file, inferring the delimiter from its header line.
    pub fn open(path: &Path) -> Result<Self> {
        let delimiter = detect_delimiter(path)?;
        let file = File::open(path).map_err(|e| SeqgateError::io(path, e))?;
        let mut reader = reader_builder(delimiter).from_reader(file);
        let header = reader.headers()?.iter().map(|s| s.to_string()).collect();

        Ok(Self { header, reader })
    }

    /// The header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Iterate over body rows lazily.
    pub fn records(&mut self) -> csv::StringRecordsIter<'_, File> {
        self.reader.records()
    }
}

/// csv reader setup shared by header reads and body iteration.
///
/// Flexible mode is required: ragged rows are a structural finding to
/// report, not a parse error to die on.
fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true);
    builder
}

/// Parse a field as a finite number, tolerating surrounding whitespace.
///
/// Non-finite values (`NaN`, `inf`) are rejected: they parse as `f64` but
/// are never legitimate measurements, and `NaN < 0.0` is false so they
/// would otherwise slip past the non-negative checks.
pub fn parse_numeric(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
