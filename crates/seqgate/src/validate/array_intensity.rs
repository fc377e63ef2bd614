//! Tabular microarray intensity data.
//!
//! A stricter structural subset of generic tabular files: the header must
//! name a probe-identifier column and an intensity/signal column. The
//! sniffer therefore tries this format before the generic count matrix.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{FormatDetails, FormatKind, ValidationRecord};

use super::tabular::{parse_numeric, read_header, TabularReader};
use super::{sample_identity, DiagnosticLimits, FormatValidator, HeaderCheck};

/// Probe identifiers: alphanumeric plus `_` and `-`.
static PROBE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Validator for microarray intensity tables.
pub struct ArrayIntensityValidator {
    limits: DiagnosticLimits,
}

impl ArrayIntensityValidator {
    /// Validator with default thresholds.
    pub fn new() -> Self {
        Self {
            limits: DiagnosticLimits::default(),
        }
    }

    /// Validator with explicit thresholds.
    pub fn with_limits(limits: DiagnosticLimits) -> Self {
        Self { limits }
    }
}

impl Default for ArrayIntensityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatValidator for ArrayIntensityValidator {
    fn format_kind(&self) -> FormatKind {
        FormatKind::ArrayIntensity
    }

    fn confirm_header(&self, path: &Path) -> HeaderCheck {
        let header = match read_header(path) {
            Ok(header) => header,
            Err(e) => return HeaderCheck::rejected(format!("cannot read header: {}", e)),
        };

        let lower: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();

        if !lower.iter().any(|h| h.contains("probe")) {
            return HeaderCheck::rejected("no probe identifier column in header");
        }

        if !lower
            .iter()
            .any(|h| h.contains("intensity") || h.contains("signal"))
        {
            return HeaderCheck::rejected("no intensity or signal column in header");
        }

        if header.len() < 3 {
            return HeaderCheck::rejected(format!(
                "need at least 3 columns (probe id, label, intensities), got {}",
                header.len()
            ));
        }

        HeaderCheck::confirmed(format!(
            "microarray header with {} columns",
            header.len()
        ))
    }

    fn validate(&self, path: &Path) -> ValidationRecord {
        let identity = sample_identity(path, FormatKind::ArrayIntensity);
        let mut diag = self.limits.accumulator();

        let header = self.confirm_header(path);
        if !header.confirmed {
            diag.reject_header(format!("header validation failed: {}", header.reason));
            return ValidationRecord::assemble(
                identity,
                FormatKind::ArrayIntensity,
                path,
                diag,
                FormatDetails::none(),
            );
        }

        let mut table = match TabularReader::open(path) {
            Ok(table) => table,
            Err(e) => {
                diag.fatal(format!("cannot read file: {}", e));
                return ValidationRecord::assemble(
                    identity,
                    FormatKind::ArrayIntensity,
                    path,
                    diag,
                    FormatDetails::none(),
                );
            }
        };

        let column_count = table.header().len();
        let mut row_count: u64 = 0;

        for (idx, row) in table.records().enumerate() {
            // Header is line 1, so the first body row is line 2.
            let line_no = idx + 2;

            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    diag.fatal(format!("read error at line {}: {}", line_no, e));
                    break;
                }
            };

            row_count += 1;

            if row.len() != column_count {
                diag.push(format!(
                    "line {}: column count {} != header {}",
                    line_no,
                    row.len(),
                    column_count
                ));
            }

            let probe_id = row.get(0).unwrap_or("");
            if !PROBE_ID.is_match(probe_id) {
                diag.push(format!(
                    "line {}: malformed probe identifier '{}'",
                    line_no, probe_id
                ));
            }

            // Columns 0 and 1 are the identifier and a descriptive label;
            // everything after is an intensity measurement.
            for (col_idx, field) in row.iter().enumerate().skip(2) {
                match parse_numeric(field) {
                    Some(value) if value < 0.0 => {
                        diag.push(format!(
                            "line {}, column {}: negative intensity {}",
                            line_no,
                            col_idx + 1,
                            value
                        ));
                    }
                    Some(_) => {}
                    None => {
                        diag.push(format!(
                            "line {}, column {}: non-numeric value '{}'",
                            line_no,
                            col_idx + 1,
                            field
                        ));
                    }
                }
            }
        }

        let details = FormatDetails {
            record_count: Some(row_count),
            column_count: Some(column_count as u64),
            is_paired_end: None,
            mean_sequence_length: None,
        };

        ValidationRecord::assemble(identity, FormatKind::ArrayIntensity, path, diag, details)
    }
}
