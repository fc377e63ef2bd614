//! Validation records: the immutable result entity produced per file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// More structural diagnostics than this means FAIL; 1..=threshold means WARN.
///
/// Kept as a named overridable constant rather than tuned.
pub const FAIL_THRESHOLD: usize = 10;

/// Cap on collected structural diagnostics per record.
///
/// Bounds memory on pathological files while staying well above
/// [`FAIL_THRESHOLD`] so the WARN/FAIL boundary remains observable.
pub const MAX_DIAGNOSTICS: usize = 50;

/// Classification outcome for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Raw sequencing reads (FASTQ, optionally gzip-compressed).
    RawReads,
    /// Aligned reads (BAM).
    AlignedReads,
    /// Tabular microarray intensity data.
    ArrayIntensity,
    /// Processed gene-by-sample count matrix.
    CountMatrix,
    /// No format confirmed. A terminal classification, not an error.
    Unknown,
}

impl FormatKind {
    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            FormatKind::RawReads => "Raw Reads (FASTQ)",
            FormatKind::AlignedReads => "Aligned Reads (BAM)",
            FormatKind::ArrayIntensity => "Microarray Intensities",
            FormatKind::CountMatrix => "Count Matrix",
            FormatKind::Unknown => "Unknown",
        }
    }
}

/// Three-level validation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTier {
    Pass,
    Warn,
    Fail,
}

impl StatusTier {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Pass => "PASS",
            StatusTier::Warn => "WARN",
            StatusTier::Fail => "FAIL",
        }
    }
}

/// Bounded diagnostic accumulator with a derived status tier.
///
/// Structural findings drive the PASS/WARN/FAIL verdict; advisories are
/// informational and never affect the tier. The tier is computed from the
/// finding count so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    findings: Vec<String>,
    advisories: Vec<String>,
    fail_threshold: usize,
    max_findings: usize,
    /// Set when a header rejection or I/O failure forces FAIL outright.
    fatal: bool,
}

impl Diagnostics {
    /// Create an accumulator with the default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(FAIL_THRESHOLD, MAX_DIAGNOSTICS)
    }

    /// Create an accumulator with explicit thresholds.
    pub fn with_thresholds(fail_threshold: usize, max_findings: usize) -> Self {
        Self {
            findings: Vec::new(),
            advisories: Vec::new(),
            fail_threshold,
            max_findings,
            fatal: false,
        }
    }

    /// Record a structural finding. Silently dropped once the cap is reached.
    pub fn push(&mut self, finding: impl Into<String>) {
        if self.findings.len() < self.max_findings {
            self.findings.push(finding.into());
        }
    }

    /// Record a non-fatal advisory. Never counts toward the tier.
    pub fn advise(&mut self, advisory: impl Into<String>) {
        if self.advisories.len() < self.max_findings {
            self.advisories.push(advisory.into());
        }
    }

    /// Record a header/magic rejection: one finding and an immediate FAIL.
    pub fn reject_header(&mut self, reason: impl Into<String>) {
        self.fatal(reason);
    }

    /// Record a fatal condition (unreadable or corrupt file): one finding
    /// and an immediate FAIL regardless of count.
    pub fn fatal(&mut self, finding: impl Into<String>) {
        self.push(finding);
        self.fatal = true;
    }

    /// Number of structural findings collected so far.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// True when no structural findings were collected.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Derive the status tier from the current findings.
    pub fn tier(&self) -> StatusTier {
        if self.fatal {
            StatusTier::Fail
        } else if self.findings.is_empty() {
            StatusTier::Pass
        } else if self.findings.len() <= self.fail_threshold {
            StatusTier::Warn
        } else {
            StatusTier::Fail
        }
    }

    fn into_parts(self) -> (StatusTier, Vec<String>, Vec<String>) {
        let tier = self.tier();
        (tier, self.findings, self.advisories)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional format-specific facts computed by a validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatDetails {
    /// Paired-end flag, inferred from filename tokens (raw reads) or the
    /// external tool (aligned reads).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paired_end: Option<bool>,
    /// Record count (sampled reads, table rows, or tool-reported reads).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u64>,
    /// Mean sequence length in bases (raw reads only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_sequence_length: Option<u64>,
    /// Column count (tabular formats only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u64>,
}

impl FormatDetails {
    /// Details with every field absent.
    pub fn none() -> Self {
        Self::default()
    }
}

/// The immutable result of validating one input file.
///
/// Once constructed a record is never mutated; corrections require
/// producing a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Deduplication key: file stem with format suffixes stripped.
    /// Stable for the same logical sample across repeated runs.
    pub sample_identity: String,
    /// Classification outcome.
    pub format_kind: FormatKind,
    /// Path the file was read from. Descriptive only.
    pub source_path: PathBuf,
    /// File size in bytes. Descriptive only.
    pub byte_size: u64,
    /// Verdict derived from the diagnostic count.
    pub status_tier: StatusTier,
    /// Ordered structural findings, bounded per validator.
    pub diagnostics: Vec<String>,
    /// Non-fatal findings that never affect the tier.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub advisories: Vec<String>,
    /// Format-specific facts, populated only when computed.
    #[serde(default)]
    pub details: FormatDetails,
    /// When this record was created. Immutable once set.
    pub observed_at: DateTime<Utc>,
}

impl ValidationRecord {
    /// Assemble a record from validator outputs.
    ///
    /// The status tier is derived from `diagnostics`; callers cannot set it
    /// directly. `byte_size` is read from the filesystem and falls back to
    /// zero when the file is gone (the diagnostics will already say so).
    pub fn assemble(
        sample_identity: impl Into<String>,
        format_kind: FormatKind,
        source_path: &Path,
        diagnostics: Diagnostics,
        details: FormatDetails,
    ) -> Self {
        let (status_tier, diagnostics, advisories) = diagnostics.into_parts();
        let byte_size = std::fs::metadata(source_path).map(|m| m.len()).unwrap_or(0);

        Self {
            sample_identity: sample_identity.into(),
            format_kind,
            source_path: source_path.to_path_buf(),
            byte_size,
            status_tier,
            diagnostics,
            advisories,
            details,
            observed_at: Utc::now(),
        }
    }
}
