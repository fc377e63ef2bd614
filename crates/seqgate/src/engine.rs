//! Main Seqgate engine: sniff, dispatch to a validator, produce a record.

use std::path::Path;
use std::sync::Arc;

use crate::record::{FormatDetails, FormatKind, ValidationRecord, FAIL_THRESHOLD, MAX_DIAGNOSTICS};
use crate::sniff::sniff_format;
use crate::tool::ReadCounter;
use crate::validate::{
    sample_identity, AlignedReadsValidator, ArrayIntensityValidator, CountMatrixValidator,
    DiagnosticLimits, FormatValidator, RawReadsValidator, SAMPLE_CAP,
};

/// Configuration for the engine.
///
/// The defaults are the crate's named constants; override them here
/// rather than editing the constants.
#[derive(Debug, Clone)]
pub struct SeqgateConfig {
    /// More structural diagnostics than this means FAIL.
    pub fail_threshold: usize,
    /// Cap on collected diagnostics per record.
    pub max_diagnostics: usize,
    /// Raw-reads record sampling cap.
    pub sample_cap: usize,
}

impl Default for SeqgateConfig {
    fn default() -> Self {
        Self {
            fail_threshold: FAIL_THRESHOLD,
            max_diagnostics: MAX_DIAGNOSTICS,
            sample_cap: SAMPLE_CAP,
        }
    }
}

/// The format-detection and structural-validation engine.
///
/// Per-file processing is side-effect-free and never returns an error:
/// every failure mode resolves to a FAIL [`ValidationRecord`], so a batch
/// with individually failed files still completes.
pub struct Seqgate {
    config: SeqgateConfig,
    read_counter: Option<Arc<dyn ReadCounter>>,
}

impl Seqgate {
    /// Engine with default configuration and no external tool.
    pub fn new() -> Self {
        Self::with_config(SeqgateConfig::default())
    }

    /// Engine with custom configuration.
    pub fn with_config(config: SeqgateConfig) -> Self {
        Self {
            config,
            read_counter: None,
        }
    }

    /// Attach the external read-counting capability used to enrich
    /// aligned-reads records. Injectable so tests can simulate
    /// tool-present/tool-absent deterministically.
    pub fn with_read_counter(mut self, counter: impl ReadCounter + 'static) -> Self {
        self.read_counter = Some(Arc::new(counter));
        self
    }

    fn limits(&self) -> DiagnosticLimits {
        DiagnosticLimits {
            fail_threshold: self.config.fail_threshold,
            max_diagnostics: self.config.max_diagnostics,
        }
    }

    /// Classify and validate one input file.
    pub fn ingest(&self, path: impl AsRef<Path>) -> ValidationRecord {
        let path = path.as_ref();
        let kind = sniff_format(path);

        match kind {
            FormatKind::RawReads => {
                RawReadsValidator::with_limits(self.limits(), self.config.sample_cap)
                    .validate(path)
            }
            FormatKind::AlignedReads => {
                AlignedReadsValidator::with_limits(self.limits(), self.read_counter.clone())
                    .validate(path)
            }
            FormatKind::ArrayIntensity => {
                ArrayIntensityValidator::with_limits(self.limits()).validate(path)
            }
            FormatKind::CountMatrix => {
                CountMatrixValidator::with_limits(self.limits()).validate(path)
            }
            FormatKind::Unknown => self.unknown_record(path),
        }
    }

    /// Validate a batch of files, strictly sequentially.
    ///
    /// Failing files never abort the batch; the caller decides what to do
    /// with the collected records.
    pub fn ingest_batch<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<ValidationRecord> {
        paths.iter().map(|p| self.ingest(p)).collect()
    }

    /// Terminal record for a file no validator confirmed.
    fn unknown_record(&self, path: &Path) -> ValidationRecord {
        let mut diag = self.limits().accumulator();

        if path.exists() {
            diag.fatal("no supported format confirmed for this file");
        } else {
            diag.fatal(format!("file not found: {}", path.display()));
        }

        ValidationRecord::assemble(
            sample_identity(path, FormatKind::Unknown),
            FormatKind::Unknown,
            path,
            diag,
            FormatDetails::none(),
        )
    }
}

impl Default for Seqgate {
    fn default() -> Self {
        Self::new()
    }
}
