//! Format sniffing: cheap, partial-content classification.
//!
//! Two stages: the extension and name tokens narrow the candidate set, then
//! the candidate validator's lightweight header check confirms. Extension
//! hints never confirm a format by themselves, and no file is read in full
//! here — only a small fixed prefix.

use std::path::Path;

use crate::record::FormatKind;
use crate::validate::{
    AlignedReadsValidator, ArrayIntensityValidator, CountMatrixValidator, FormatValidator,
    RawReadsValidator,
};

/// Classify a file into exactly one [`FormatKind`].
///
/// `Unknown` is a terminal classification, not an error; downstream code
/// must handle it without failing.
pub fn sniff_format(path: &Path) -> FormatKind {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let raw_reads_candidate = matches!(extension.as_str(), "fastq" | "fq")
        || (extension == "gz" && (name.contains("fastq") || name.contains("fq")));

    if raw_reads_candidate && RawReadsValidator::new().confirm_header(path).confirmed {
        return FormatKind::RawReads;
    }

    if extension == "bam" && AlignedReadsValidator::new().confirm_header(path).confirmed {
        return FormatKind::AlignedReads;
    }

    if matches!(extension.as_str(), "tsv" | "csv" | "txt") {
        // Deliberate tie-break: array tables are a stricter structural
        // subset of generic tabular files, so they must be tried first.
        if ArrayIntensityValidator::new()
            .confirm_header(path)
            .confirmed
        {
            return FormatKind::ArrayIntensity;
        }

        if CountMatrixValidator::new().confirm_header(path).confirmed {
            return FormatKind::CountMatrix;
        }
    }

    FormatKind::Unknown
}
