//! Seqgate: format detection and structural validation for bioinformatics
//! pipeline inputs.
//!
//! Seqgate answers two questions per input file: what kind of data is this,
//! and is it structurally trustworthy enough to proceed? It classifies files
//! into a closed set of formats (raw reads, aligned reads, microarray
//! intensities, count matrices), runs a per-format structural check, and
//! merges the results into a cumulative, deduplicated report.
//!
//! # Core Principles
//!
//! - **Content over names**: extensions narrow candidates; content confirms
//! - **Never crash the batch**: every failure mode becomes a FAIL record
//! - **Non-destructive**: input files are never mutated or repaired
//!
//! # Example
//!
//! ```no_run
//! use seqgate::{AccumulatedReport, Seqgate};
//!
//! let engine = Seqgate::new();
//! let record = engine.ingest("sample_R1.fastq.gz");
//!
//! println!("{}: {}", record.sample_identity, record.status_tier.label());
//!
//! let mut report = AccumulatedReport::load_or_default("report.json");
//! report.merge(vec![record]);
//! report.save("report.json").unwrap();
//! ```

pub mod error;
pub mod input;
pub mod record;
pub mod report;
pub mod sniff;
pub mod tool;
pub mod validate;

mod engine;

pub use engine::{Seqgate, SeqgateConfig};
pub use error::{Result, SeqgateError};
pub use record::{
    Diagnostics, FormatDetails, FormatKind, StatusTier, ValidationRecord, FAIL_THRESHOLD,
    MAX_DIAGNOSTICS,
};
pub use report::{AccumulatedReport, MergeOutcome, StatusCounts, REPORT_VERSION};
pub use sniff::sniff_format;
pub use tool::{ReadCounter, SamtoolsReadCounter, StubReadCounter, TOOL_TIMEOUT};
pub use validate::{sample_identity, FormatValidator, HeaderCheck, SAMPLE_CAP};
