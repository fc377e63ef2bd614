//! Aligned reads (BAM), the binary alignment format.
//!
//! Structural confirmation is the 4-byte magic prefix only. Deep statistics
//! come from an injected [`ReadCounter`]; when that capability is missing or
//! errors, the record still passes on magic validity alone with the
//! enrichment fields left absent.

use std::path::Path;
use std::sync::Arc;

use crate::input::read_magic;
use crate::record::{FormatDetails, FormatKind, ValidationRecord};
use crate::tool::ReadCounter;

use super::{sample_identity, DiagnosticLimits, FormatValidator, HeaderCheck};

/// Magic prefix of a BAM stream.
const BAM_MAGIC: &[u8; 4] = b"BAM\x01";

/// Validator for BAM files.
pub struct AlignedReadsValidator {
    limits: DiagnosticLimits,
    counter: Option<Arc<dyn ReadCounter>>,
}

impl AlignedReadsValidator {
    /// Validator with no external tool attached.
    pub fn new() -> Self {
        Self {
            limits: DiagnosticLimits::default(),
            counter: None,
        }
    }

    /// Validator with explicit thresholds and an optional read counter.
    pub fn with_limits(limits: DiagnosticLimits, counter: Option<Arc<dyn ReadCounter>>) -> Self {
        Self { limits, counter }
    }
}

impl Default for AlignedReadsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatValidator for AlignedReadsValidator {
    fn format_kind(&self) -> FormatKind {
        FormatKind::AlignedReads
    }

    fn confirm_header(&self, path: &Path) -> HeaderCheck {
        let magic = match read_magic::<4>(path) {
            Ok(magic) => magic,
            Err(e) => return HeaderCheck::rejected(format!("cannot read file: {}", e)),
        };

        if magic == BAM_MAGIC {
            HeaderCheck::confirmed("valid BAM magic prefix")
        } else {
            let hex: Vec<String> = magic.iter().map(|b| format!("{:02x}", b)).collect();
            HeaderCheck::rejected(format!(
                "invalid BAM magic prefix: [{}] (expected 42 41 4d 01)",
                hex.join(" ")
            ))
        }
    }

    fn validate(&self, path: &Path) -> ValidationRecord {
        let identity = sample_identity(path, FormatKind::AlignedReads);
        let mut diag = self.limits.accumulator();

        let header = self.confirm_header(path);
        if !header.confirmed {
            // Magic failure short-circuits; the body is irrelevant.
            diag.reject_header(format!("magic validation failed: {}", header.reason));
            return ValidationRecord::assemble(
                identity,
                FormatKind::AlignedReads,
                path,
                diag,
                FormatDetails::none(),
            );
        }

        // Tool unavailability must never downgrade an otherwise-valid file.
        let total_reads = self
            .counter
            .as_ref()
            .and_then(|counter| counter.total_reads(path));

        let details = FormatDetails {
            record_count: total_reads,
            is_paired_end: total_reads.map(|n| n > 0),
            mean_sequence_length: None,
            column_count: None,
        };

        ValidationRecord::assemble(identity, FormatKind::AlignedReads, path, diag, details)
    }
}
