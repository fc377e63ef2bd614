//! Structural validators, one per known format.
//!
//! Every validator implements the same two-method contract: a cheap header
//! confirmation used by the sniffer, and a full-body check producing a
//! [`ValidationRecord`]. Validators never return errors — every failure mode,
//! including unreadable files, resolves to a FAIL record.

mod aligned_reads;
mod array_intensity;
mod count_matrix;
mod raw_reads;
mod tabular;

pub use aligned_reads::AlignedReadsValidator;
pub use array_intensity::ArrayIntensityValidator;
pub use count_matrix::CountMatrixValidator;
pub use raw_reads::{RawReadsValidator, SAMPLE_CAP};

use std::path::Path;

use crate::record::{Diagnostics, FormatKind, ValidationRecord, FAIL_THRESHOLD, MAX_DIAGNOSTICS};

/// Shared tier thresholds handed to every validator.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticLimits {
    /// More structural findings than this means FAIL.
    pub fail_threshold: usize,
    /// Cap on collected findings.
    pub max_diagnostics: usize,
}

impl Default for DiagnosticLimits {
    fn default() -> Self {
        Self {
            fail_threshold: FAIL_THRESHOLD,
            max_diagnostics: MAX_DIAGNOSTICS,
        }
    }
}

impl DiagnosticLimits {
    /// A fresh accumulator using these thresholds.
    pub fn accumulator(&self) -> Diagnostics {
        Diagnostics::with_thresholds(self.fail_threshold, self.max_diagnostics)
    }
}

/// Outcome of a lightweight header confirmation.
#[derive(Debug, Clone)]
pub struct HeaderCheck {
    /// Whether the header matched the format's grammar.
    pub confirmed: bool,
    /// Human-readable reason, suitable as a diagnostic on rejection.
    pub reason: String,
}

impl HeaderCheck {
    /// A successful confirmation.
    pub fn confirmed(reason: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            reason: reason.into(),
        }
    }

    /// A rejection.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            reason: reason.into(),
        }
    }
}

/// Common contract for per-format structural validators.
///
/// The format set is closed: selection happens by matching on
/// [`FormatKind`], not by registering implementations dynamically.
pub trait FormatValidator {
    /// The format this validator owns.
    fn format_kind(&self) -> FormatKind;

    /// Cheap confirmation reading only a small fixed prefix of the file.
    /// Used by the sniffer; must not read the file in full.
    fn confirm_header(&self, path: &Path) -> HeaderCheck;

    /// Full structural check. Header rejection short-circuits to FAIL
    /// without inspecting the body.
    fn validate(&self, path: &Path) -> ValidationRecord;
}

/// Derive the deduplication key for a file: the base name with the
/// format's own suffixes stripped.
///
/// Must stay stable for the same logical sample across runs; the
/// aggregator depends on it.
pub fn sample_identity(path: &Path, kind: FormatKind) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stripped = match kind {
        FormatKind::RawReads => {
            let mut stem = name.as_str();
            loop {
                let next = stem
                    .strip_suffix(".gz")
                    .or_else(|| stem.strip_suffix(".fastq"))
                    .or_else(|| stem.strip_suffix(".fq"));
                match next {
                    Some(s) => stem = s,
                    None => break,
                }
            }
            stem.to_string()
        }
        FormatKind::AlignedReads => name
            .strip_suffix(".bam")
            .unwrap_or(name.as_str())
            .to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    // Aggregator invariant: identities are never empty. For paths with no
    // usable file name (e.g. a bare `/`), fall back to the full path.
    if !stripped.is_empty() {
        stripped
    } else if !name.is_empty() {
        name
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_identity_strips_fastq_chain() {
        assert_eq!(
            sample_identity(Path::new("/data/liver_R1.fastq.gz"), FormatKind::RawReads),
            "liver_R1"
        );
        assert_eq!(
            sample_identity(Path::new("sample.fq"), FormatKind::RawReads),
            "sample"
        );
    }

    #[test]
    fn test_sample_identity_strips_bam() {
        assert_eq!(
            sample_identity(Path::new("/runs/tumor.bam"), FormatKind::AlignedReads),
            "tumor"
        );
    }

    #[test]
    fn test_sample_identity_tabular_uses_stem() {
        assert_eq!(
            sample_identity(Path::new("counts.tsv"), FormatKind::CountMatrix),
            "counts"
        );
        assert_eq!(
            sample_identity(Path::new("chip1.txt"), FormatKind::ArrayIntensity),
            "chip1"
        );
    }

    #[test]
    fn test_sample_identity_never_empty() {
        let root = sample_identity(Path::new("/"), FormatKind::CountMatrix);
        assert_eq!(root, "/");

        let bare_suffix = sample_identity(Path::new(".fastq.gz"), FormatKind::RawReads);
        assert!(!bare_suffix.is_empty());
    }

    #[test]
    fn test_sample_identity_stable_across_runs() {
        let a = sample_identity(Path::new("/a/s1.fastq.gz"), FormatKind::RawReads);
        let b = sample_identity(Path::new("/b/s1.fastq.gz"), FormatKind::RawReads);
        assert_eq!(a, b);
    }
}
