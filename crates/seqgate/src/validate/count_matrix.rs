//! Processed gene-by-sample count matrices.
//!
//! The most permissive tabular format: any delimited table with an
//! identifier column and numeric sample columns. Normalized matrices are
//! legitimately non-integer, so non-integer values are advisories, never
//! structural defects.

use std::path::Path;

use crate::input::read_prefix_lines;
use crate::record::{FormatDetails, FormatKind, ValidationRecord};

use super::tabular::{parse_numeric, read_header, TabularReader};
use super::{sample_identity, DiagnosticLimits, FormatValidator, HeaderCheck};

/// Validator for count matrices.
pub struct CountMatrixValidator {
    limits: DiagnosticLimits,
}

impl CountMatrixValidator {
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

impl Default for CountMatrixValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatValidator for CountMatrixValidator {
    fn format_kind(&self) -> FormatKind {
        FormatKind::CountMatrix
    }

    fn confirm_header(&self, path: &Path) -> HeaderCheck {
        let header = match read_header(path) {
            Ok(header) => header,
            Err(e) => return HeaderCheck::rejected(format!("cannot read header: {}", e)),
        };

        if header.len() < 2 {
            return HeaderCheck::rejected(format!(
                "need at least 2 columns (identifier + sample), got {}",
                header.len()
            ));
        }

        // A matrix without data rows is not a matrix.
        match read_prefix_lines(path, 2) {
            Ok(lines) if lines.len() >= 2 => {}
            Ok(_) => return HeaderCheck::rejected("no data rows after the header"),
            Err(e) => return HeaderCheck::rejected(format!("cannot read file: {}", e)),
        }

        HeaderCheck::confirmed(format!("matrix header with {} columns", header.len()))
    }

    fn validate(&self, path: &Path) -> ValidationRecord {
        let identity = sample_identity(path, FormatKind::CountMatrix);
        let mut diag = self.limits.accumulator();

        let header_check = self.confirm_header(path);
        if !header_check.confirmed {
            diag.reject_header(format!(
                "structure validation failed: {}",
                header_check.reason
            ));
            return ValidationRecord::assemble(
                identity,
                FormatKind::CountMatrix,
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
                    FormatKind::CountMatrix,
                    path,
                    diag,
                    FormatDetails::none(),
                );
            }
        };

        let column_count = table.header().len();

        let first_column = table.header().first().cloned().unwrap_or_default();
        let first_lower = first_column.to_lowercase();
        if !first_lower.contains("gene") && !first_lower.contains("id") {
            diag.advise(format!(
                "first column '{}' may not be an identifier column",
                first_column
            ));
        }

        let mut row_count: u64 = 0;

        for (idx, row) in table.records().enumerate() {
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

            let gene_id = row.get(0).unwrap_or("");
            if gene_id.trim().is_empty() {
                diag.push(format!("line {}: empty row identifier", line_no));
            }

            for (col_idx, field) in row.iter().enumerate().skip(1) {
                match parse_numeric(field) {
                    Some(value) if value < 0.0 => {
                        diag.push(format!(
                            "line {}, column {}: negative count {}",
                            line_no,
                            col_idx + 1,
                            value
                        ));
                    }
                    Some(value) if value.fract() != 0.0 => {
                        // Normalized/processed matrices are allowed here.
                        diag.advise(format!(
                            "line {}, column {}: non-integer count {}",
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

        ValidationRecord::assemble(identity, FormatKind::CountMatrix, path, diag, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StatusTier;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tsv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_valid_matrix_passes() {
        let file = tsv_file(
            "gene_id\tsample_1\tsample_2\n\
             ENSG01\t10\t0\n\
             ENSG02\t4\t250\n",
        );
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Pass);
        assert!(record.diagnostics.is_empty());
        assert!(record.advisories.is_empty());
        assert_eq!(record.details.record_count, Some(2));
        assert_eq!(record.details.column_count, Some(3));
    }

    #[test]
    fn test_comma_delimited_accepted() {
        let file = tsv_file("gene_id,s1\ng1,5\n");
        let record = CountMatrixValidator::new().validate(file.path());
        assert_eq!(record.status_tier, StatusTier::Pass);
    }

    #[test]
    fn test_single_column_rejected() {
        let file = tsv_file("gene_id\ng1\n");
        let check = CountMatrixValidator::new().confirm_header(file.path());
        assert!(!check.confirmed);
    }

    #[test]
    fn test_header_only_rejected() {
        let file = tsv_file("gene_id\ts1\n");
        let check = CountMatrixValidator::new().confirm_header(file.path());
        assert!(!check.confirmed);
        assert!(check.reason.contains("data rows"));
    }

    #[test]
    fn test_non_integer_is_advisory_only() {
        let file = tsv_file("gene_id\ts1\ng1\t3.5\n");
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Pass);
        assert!(record.diagnostics.is_empty());
        assert_eq!(record.advisories.len(), 1);
        assert!(record.advisories[0].contains("non-integer"));
    }

    #[test]
    fn test_non_finite_counts_are_structural() {
        // NaN and inf parse as f64 but are never legitimate counts; they
        // must surface as structural findings, not pass the sign check.
        let file = tsv_file(
            "gene_id\ts1\ts2\n\
             g1\tNaN\tinf\n\
             g2\tNaN\tNaN\n",
        );
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Warn);
        assert_eq!(record.diagnostics.len(), 4);
        assert!(record.diagnostics[0].contains("non-numeric"));
        assert!(record.advisories.is_empty());
    }

    #[test]
    fn test_negative_is_structural() {
        let file = tsv_file("gene_id\ts1\ng1\t-3\n");
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Warn);
        assert_eq!(record.diagnostics.len(), 1);
        assert!(record.diagnostics[0].contains("negative"));
    }

    #[test]
    fn test_weak_identifier_header_is_advisory() {
        let file = tsv_file("feature\ts1\ng1\t5\n");
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Pass);
        assert_eq!(record.advisories.len(), 1);
    }

    #[test]
    fn test_empty_identifier_flagged() {
        let file = tsv_file("gene_id\ts1\n\t5\n");
        let record = CountMatrixValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Warn);
        assert!(record.diagnostics[0].contains("empty row identifier"));
    }

    #[test]
    fn test_tier_boundary_ten_warn_eleven_fail() {
        // One negative value per row: each contributes exactly one
        // structural diagnostic.
        let mut ten = String::from("gene_id\ts1\n");
        for i in 0..10 {
            ten.push_str(&format!("g{}\t-1\n", i));
        }
        let file = tsv_file(&ten);
        let record = CountMatrixValidator::new().validate(file.path());
        assert_eq!(record.diagnostics.len(), 10);
        assert_eq!(record.status_tier, StatusTier::Warn);

        let mut eleven = String::from("gene_id\ts1\n");
        for i in 0..11 {
            eleven.push_str(&format!("g{}\t-1\n", i));
        }
        let file = tsv_file(&eleven);
        let record = CountMatrixValidator::new().validate(file.path());
        assert_eq!(record.diagnostics.len(), 11);
        assert_eq!(record.status_tier, StatusTier::Fail);
    }
}
