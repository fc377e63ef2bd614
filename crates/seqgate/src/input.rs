//! Low-level file access helpers shared by the sniffer and validators.
//!
//! Gzip decompression is transparent: callers get a `BufRead` regardless of
//! whether the underlying file is compressed.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Result, SeqgateError};

/// Open a text file for line-oriented reading, decompressing `.gz` inputs.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| SeqgateError::io(path, e))?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read up to `count` lines from the start of a file.
///
/// Used by header confirmation: no file is ever read in full during
/// sniffing. Trailing newlines are stripped.
pub fn read_prefix_lines(path: &Path, count: usize) -> Result<Vec<String>> {
    let reader = open_text(path)?;
    let mut lines = Vec::with_capacity(count);

    for line in reader.lines().take(count) {
        let line = line.map_err(|e| SeqgateError::io(path, e))?;
        lines.push(line);
    }

    Ok(lines)
}

/// Read the first `N` raw bytes of a file.
///
/// Returns fewer bytes than requested for truncated files, which callers
/// treat as a confirmation failure.
pub fn read_magic<const N: usize>(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| SeqgateError::io(path, e))?;
    let mut buf = [0u8; N];

    let mut filled = 0;
    while filled < N {
        let n = file
            .read(&mut buf[filled..])
            .map_err(|e| SeqgateError::io(path, e))?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    Ok(buf[..filled].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_prefix_lines_plain() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "line one").unwrap();
        writeln!(file, "line two").unwrap();
        writeln!(file, "line three").unwrap();

        let lines = read_prefix_lines(file.path(), 2).unwrap();
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn test_open_text_gzip_transparent() {
        let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(File::create(file.path()).unwrap(), Compression::fast());
        encoder.write_all(b"@read1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let lines = read_prefix_lines(file.path(), 2).unwrap();
        assert_eq!(lines, vec!["@read1", "ACGT"]);
    }

    #[test]
    fn test_read_magic_truncated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"BA").unwrap();

        let magic = read_magic::<4>(file.path()).unwrap();
        assert_eq!(magic, b"BA");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_prefix_lines(Path::new("/no/such/file.fastq"), 4).unwrap_err();
        assert!(matches!(err, SeqgateError::Io { .. }));
    }
}
