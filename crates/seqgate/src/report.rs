//! Cumulative report state: persistence and deduplicating merge.
//!
//! The persisted form is always a complete, self-consistent snapshot wrapped
//! in a versioned envelope (never a bare array). Deduplication by sample
//! identity happens here and nowhere else; rendering collaborators consume
//! the collection read-only.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqgateError};
use crate::record::{StatusTier, ValidationRecord};

/// Current version of the persisted report envelope.
pub const REPORT_VERSION: &str = "1.0.0";

/// Pass/warn/fail totals, always recomputed from the record collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl StatusCounts {
    /// Tally a record collection.
    pub fn from_records(records: &[ValidationRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.status_tier {
                StatusTier::Pass => counts.pass += 1,
                StatusTier::Warn => counts.warn += 1,
                StatusTier::Fail => counts.fail += 1,
            }
        }
        counts
    }

    /// Total across all tiers.
    pub fn total(&self) -> usize {
        self.pass + self.warn + self.fail
    }
}

/// Result of one merge step.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Records appended this merge.
    pub added: usize,
    /// Identities dropped as already present (or empty), in arrival order.
    pub skipped: Vec<String>,
}

/// The persisted collection of validation records, unique by sample
/// identity, ordered by first arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulatedReport {
    /// Envelope version, for downstream readers.
    pub version: String,
    /// When the collection last changed.
    pub generated_at: DateTime<Utc>,
    /// Total record count (equals `records.len()`).
    pub total_samples: usize,
    /// Tier totals recomputed from `records`.
    pub summary: StatusCounts,
    /// The full record collection.
    pub records: Vec<ValidationRecord>,
}

impl AccumulatedReport {
    /// An empty report.
    pub fn new() -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            generated_at: Utc::now(),
            total_samples: 0,
            summary: StatusCounts::default(),
            records: Vec::new(),
        }
    }

    /// Merge new records into the collection.
    ///
    /// Records whose identity is already present are dropped silently, as
    /// are records with an empty identity (they cannot deduplicate);
    /// survivors are appended after all persisted records in arrival order.
    /// Idempotent: merging the same batch twice leaves the report — and its
    /// serialized form — exactly as after the first merge. Summary counts
    /// are recomputed from the merged collection, never carried forward.
    pub fn merge(&mut self, new_records: Vec<ValidationRecord>) -> MergeOutcome {
        let mut seen: IndexSet<String> = self
            .records
            .iter()
            .map(|r| r.sample_identity.clone())
            .collect();

        let mut outcome = MergeOutcome::default();

        for record in new_records {
            // An empty identity cannot deduplicate; refuse it rather than
            // letting one slot shadow every such record.
            if record.sample_identity.is_empty() {
                outcome.skipped.push(record.sample_identity);
                continue;
            }
            if seen.insert(record.sample_identity.clone()) {
                self.records.push(record);
                outcome.added += 1;
            } else {
                outcome.skipped.push(record.sample_identity);
            }
        }

        if outcome.added > 0 {
            self.total_samples = self.records.len();
            self.summary = StatusCounts::from_records(&self.records);
            self.generated_at = Utc::now();
        }

        outcome
    }

    /// Load a persisted report.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            SeqgateError::Persistence(format!("failed to open '{}': {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        let report: AccumulatedReport = serde_json::from_reader(reader).map_err(|e| {
            SeqgateError::Persistence(format!("failed to parse '{}': {}", path.display(), e))
        })?;

        Ok(report)
    }

    /// Load a persisted report, or start an empty one when none exists.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path).unwrap_or_else(|_| Self::new())
        } else {
            Self::new()
        }
    }

    /// Persist the full snapshot.
    ///
    /// Written through a temporary sibling file and renamed into place, so a
    /// concurrent reader never observes a partial write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    SeqgateError::Persistence(format!(
                        "failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        let file = File::create(&tmp_path).map_err(|e| {
            SeqgateError::Persistence(format!("failed to create '{}': {}", tmp_path.display(), e))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            SeqgateError::Persistence(format!("failed to serialize report: {}", e))
        })?;

        fs::rename(&tmp_path, path).map_err(|e| {
            SeqgateError::Persistence(format!(
                "failed to replace '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

impl Default for AccumulatedReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Diagnostics, FormatDetails, FormatKind};

    fn record(identity: &str, findings: usize) -> ValidationRecord {
        let mut diag = Diagnostics::new();
        for i in 0..findings {
            diag.push(format!("finding {}", i));
        }
        ValidationRecord::assemble(
            identity,
            FormatKind::CountMatrix,
            Path::new("/data/input.tsv"),
            diag,
            FormatDetails::none(),
        )
    }

    #[test]
    fn test_merge_deduplicates_by_identity() {
        let mut report = AccumulatedReport::new();
        let outcome = report.merge(vec![record("a", 0), record("b", 1), record("a", 5)]);

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, vec!["a".to_string()]);
        assert_eq!(report.total_samples, 2);
        // The first record for an identity wins.
        assert_eq!(report.records[0].status_tier, StatusTier::Pass);
    }

    #[test]
    fn test_merge_refuses_empty_identity() {
        let mut report = AccumulatedReport::new();
        let outcome = report.merge(vec![record("", 0), record("a", 0)]);

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.skipped, vec![String::new()]);
        assert_eq!(report.total_samples, 1);
        assert_eq!(report.records[0].sample_identity, "a");
    }

    #[test]
    fn test_merge_preserves_arrival_order() {
        let mut report = AccumulatedReport::new();
        report.merge(vec![record("first", 0)]);
        report.merge(vec![record("second", 0), record("third", 0)]);

        let identities: Vec<&str> = report
            .records
            .iter()
            .map(|r| r.sample_identity.as_str())
            .collect();
        assert_eq!(identities, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_merge_idempotent_byte_for_byte() {
        let batch = vec![record("a", 0), record("b", 12)];

        let mut report = AccumulatedReport::new();
        report.merge(batch.clone());
        let after_first = serde_json::to_vec(&report).unwrap();

        let outcome = report.merge(batch);
        let after_second = serde_json::to_vec(&report).unwrap();

        assert_eq!(outcome.added, 0);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_summary_recomputed_from_collection() {
        let mut report = AccumulatedReport::new();
        report.merge(vec![record("pass", 0), record("warn", 3), record("fail", 11)]);

        assert_eq!(
            report.summary,
            StatusCounts {
                pass: 1,
                warn: 1,
                fail: 1
            }
        );
        assert_eq!(report.summary.total(), 3);
    }

    #[test]
    fn test_envelope_is_object_not_bare_array() {
        let report = AccumulatedReport::new();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.is_object());
        assert!(value.get("version").is_some());
        assert!(value.get("generated_at").is_some());
        assert!(value.get("total_samples").is_some());
        assert!(value.get("records").is_some_and(|r| r.is_array()));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = AccumulatedReport::new();
        report.merge(vec![record("a", 0), record("b", 1)]);
        report.save(&path).unwrap();

        let loaded = AccumulatedReport::load(&path).unwrap();
        assert_eq!(loaded.total_samples, 2);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.summary, report.summary);

        // The temp file from the atomic rename must not linger.
        assert!(!dir.path().join("report.json.tmp").exists());
    }

    #[test]
    fn test_load_or_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let report = AccumulatedReport::load_or_default(dir.path().join("absent.json"));
        assert_eq!(report.total_samples, 0);
    }
}
