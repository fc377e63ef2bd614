//! Raw sequencing reads (FASTQ), the four-line repeating record format.

use std::io::BufRead;
use std::path::Path;

use crate::input::{open_text, read_prefix_lines};
use crate::record::{FormatDetails, FormatKind, ValidationRecord};

use super::{sample_identity, DiagnosticLimits, FormatValidator, HeaderCheck};

/// How many records the full-body check samples before stopping.
///
/// The verdict on a raw-reads file is therefore a sample-based estimate of
/// file health, not an exhaustive guarantee.
pub const SAMPLE_CAP: usize = 1000;

/// Filename tokens that mark one mate of a paired-end run.
const PAIRED_TOKENS: [&str; 6] = ["_R1", "_R2", "_1", "_2", ".1", ".2"];

/// Extended nucleotide code: standard bases plus IUPAC ambiguity codes.
fn is_valid_base(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'A' | 'C' | 'G' | 'T' | 'N' | 'R' | 'Y' | 'W' | 'S' | 'K' | 'M' | 'B' | 'D' | 'H' | 'V'
    )
}

/// Printable-ASCII range valid for quality characters (Phred+33 and up).
fn is_valid_quality(c: char) -> bool {
    (33..=126).contains(&(c as u32))
}

/// Validator for FASTQ files, gzip-compressed or plain.
pub struct RawReadsValidator {
    limits: DiagnosticLimits,
    sample_cap: usize,
}

impl RawReadsValidator {
    /// Validator with the default thresholds and sampling cap.
    pub fn new() -> Self {
        Self {
            limits: DiagnosticLimits::default(),
            sample_cap: SAMPLE_CAP,
        }
    }

    /// Validator with explicit thresholds and sampling cap.
    pub fn with_limits(limits: DiagnosticLimits, sample_cap: usize) -> Self {
        Self { limits, sample_cap }
    }

    /// Inspect only the first record's four lines.
    fn check_first_record(&self, path: &Path) -> HeaderCheck {
        let lines = match read_prefix_lines(path, 4) {
            Ok(lines) => lines,
            Err(e) => return HeaderCheck::rejected(format!("cannot read file: {}", e)),
        };

        if lines.len() < 4 {
            return HeaderCheck::rejected(format!(
                "file has {} lines, need 4 for a complete record",
                lines.len()
            ));
        }

        let (header, seq, plus, qual) = (&lines[0], &lines[1], &lines[2], &lines[3]);

        if !header.starts_with('@') {
            return HeaderCheck::rejected(format!(
                "line 1: header must start with '@', got '{}'",
                truncate(header, 20)
            ));
        }

        if !plus.starts_with('+') {
            return HeaderCheck::rejected(format!(
                "line 3: separator must start with '+', got '{}'",
                truncate(plus, 20)
            ));
        }

        if let Some(bad) = seq.chars().find(|c| !is_valid_base(*c)) {
            return HeaderCheck::rejected(format!(
                "line 2: invalid nucleotide '{}' in sequence",
                bad
            ));
        }

        if seq.len() != qual.len() {
            return HeaderCheck::rejected(format!(
                "sequence length ({}) != quality length ({})",
                seq.len(),
                qual.len()
            ));
        }

        if qual.chars().any(|c| !is_valid_quality(c)) {
            return HeaderCheck::rejected("line 4: quality characters outside ASCII 33-126");
        }

        HeaderCheck::confirmed("valid FASTQ record structure")
    }
}

impl Default for RawReadsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatValidator for RawReadsValidator {
    fn format_kind(&self) -> FormatKind {
        FormatKind::RawReads
    }

    fn confirm_header(&self, path: &Path) -> HeaderCheck {
        self.check_first_record(path)
    }

    fn validate(&self, path: &Path) -> ValidationRecord {
        let identity = sample_identity(path, FormatKind::RawReads);
        let mut diag = self.limits.accumulator();

        let header = self.confirm_header(path);
        if !header.confirmed {
            diag.reject_header(format!("header validation failed: {}", header.reason));
            return ValidationRecord::assemble(
                identity,
                FormatKind::RawReads,
                path,
                diag,
                FormatDetails::none(),
            );
        }

        let reader = match open_text(path) {
            Ok(reader) => reader,
            Err(e) => {
                diag.fatal(format!("cannot read file: {}", e));
                return ValidationRecord::assemble(
                    identity,
                    FormatKind::RawReads,
                    path,
                    diag,
                    FormatDetails::none(),
                );
            }
        };

        let mut record_count: u64 = 0;
        let mut total_bases: u64 = 0;
        let mut buffer: Vec<String> = Vec::with_capacity(4);

        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    // Mid-body corruption (e.g. a bad gzip stream).
                    diag.fatal(format!("read error after {} records: {}", record_count, e));
                    break;
                }
            };

            buffer.push(line);
            if buffer.len() < 4 {
                continue;
            }

            record_count += 1;
            let record_no = record_count;
            let (header, seq, plus, qual) = (&buffer[0], &buffer[1], &buffer[2], &buffer[3]);

            if !header.starts_with('@') {
                diag.push(format!("read {}: header must start with '@'", record_no));
            }
            if !plus.starts_with('+') {
                diag.push(format!("read {}: separator must start with '+'", record_no));
            }
            if let Some(bad) = seq.chars().find(|c| !is_valid_base(*c)) {
                diag.push(format!("read {}: invalid nucleotide '{}'", record_no, bad));
            }
            if seq.len() != qual.len() {
                diag.push(format!(
                    "read {}: sequence length ({}) != quality length ({})",
                    record_no,
                    seq.len(),
                    qual.len()
                ));
            }
            if qual.chars().any(|c| !is_valid_quality(c)) {
                diag.push(format!(
                    "read {}: quality characters outside ASCII 33-126",
                    record_no
                ));
            }

            total_bases += seq.len() as u64;
            buffer.clear();

            if record_count as usize >= self.sample_cap {
                break;
            }
        }

        if !buffer.is_empty() {
            diag.push(format!(
                "truncated record at end of sample ({} trailing lines)",
                buffer.len()
            ));
        }

        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let is_paired = file_name
            .as_deref()
            .map(|name| PAIRED_TOKENS.iter().any(|t| name.contains(t)));

        let details = FormatDetails {
            is_paired_end: is_paired,
            record_count: Some(record_count),
            mean_sequence_length: if record_count > 0 {
                Some(total_bases / record_count)
            } else {
                None
            },
            column_count: None,
        };

        ValidationRecord::assemble(identity, FormatKind::RawReads, path, diag, details)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StatusTier;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fastq_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".fastq").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID_RECORD: &str = "@read1\nACGTACGT\n+\nIIIIIIII\n";

    #[test]
    fn test_minimal_valid_file_passes() {
        let file = fastq_file(VALID_RECORD);
        let record = RawReadsValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Pass);
        assert!(record.diagnostics.is_empty());
        assert_eq!(record.details.record_count, Some(1));
        assert_eq!(record.details.mean_sequence_length, Some(8));
    }

    #[test]
    fn test_bad_separator_rejected_with_line_number() {
        let file = fastq_file("@read1\nACGT\n*\nIIII\n");
        let validator = RawReadsValidator::new();

        let check = validator.confirm_header(file.path());
        assert!(!check.confirmed);
        assert!(check.reason.contains("line 3"));

        // Header rejection short-circuits: FAIL with exactly one diagnostic,
        // the body is never inspected.
        let record = validator.validate(file.path());
        assert_eq!(record.status_tier, StatusTier::Fail);
        assert_eq!(record.diagnostics.len(), 1);
        assert_eq!(record.details, FormatDetails::none());
    }

    #[test]
    fn test_invalid_nucleotide_rejected() {
        let file = fastq_file("@read1\nACXT\n+\nIIII\n");
        let check = RawReadsValidator::new().confirm_header(file.path());
        assert!(!check.confirmed);
        assert!(check.reason.contains('X'));
    }

    #[test]
    fn test_length_mismatch_counted_per_read() {
        // First record valid so the header check passes; the next two have
        // sequence/quality length mismatches.
        let content = format!(
            "{}@read2\nACGT\n+\nIII\n@read3\nACG\n+\nIIII\n",
            VALID_RECORD
        );
        let file = fastq_file(&content);
        let record = RawReadsValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Warn);
        assert_eq!(record.diagnostics.len(), 2);
        assert!(record.diagnostics[0].contains("read 2"));
    }

    #[test]
    fn test_ambiguity_codes_accepted() {
        let file = fastq_file("@read1\nacgtnRYWSKMBDHV\n+\nIIIIIIIIIIIIIII\n");
        let record = RawReadsValidator::new().validate(file.path());
        assert_eq!(record.status_tier, StatusTier::Pass);
    }

    #[test]
    fn test_paired_end_from_filename_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_R1.fastq");
        std::fs::write(&path, VALID_RECORD).unwrap();

        let record = RawReadsValidator::new().validate(&path);
        assert_eq!(record.details.is_paired_end, Some(true));
        assert_eq!(record.sample_identity, "sample_R1");
    }

    #[test]
    fn test_sampling_cap_bounds_the_verdict() {
        // Third record is broken but sits beyond the cap, so it is never seen.
        let content = format!("{}{}@read3\nACGT\n+\nII\n", VALID_RECORD, VALID_RECORD);
        let file = fastq_file(&content);

        let validator = RawReadsValidator::with_limits(DiagnosticLimits::default(), 2);
        let record = validator.validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Pass);
        assert_eq!(record.details.record_count, Some(2));
    }

    #[test]
    fn test_truncated_trailing_record_flagged() {
        let content = format!("{}@read2\nACGT\n", VALID_RECORD);
        let file = fastq_file(&content);
        let record = RawReadsValidator::new().validate(file.path());

        assert_eq!(record.status_tier, StatusTier::Warn);
        assert!(record.diagnostics[0].contains("truncated"));
    }

    #[test]
    fn test_gzip_input_transparent() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.fastq.gz");
        let mut encoder =
            GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
        encoder.write_all(VALID_RECORD.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let record = RawReadsValidator::new().validate(&path);
        assert_eq!(record.status_tier, StatusTier::Pass);
        assert_eq!(record.sample_identity, "sample");
    }

    #[test]
    fn test_missing_file_fails_without_panicking() {
        let record = RawReadsValidator::new().validate(Path::new("/no/such/file.fastq"));
        assert_eq!(record.status_tier, StatusTier::Fail);
        assert_eq!(record.diagnostics.len(), 1);
    }
}
