//! External alignment-statistics tool delegation.
//!
//! The aligned-reads validator enriches its record with a total read count
//! obtained from `samtools flagstat`. The tool is an injectable capability:
//! nothing here runs at load time, and tests can substitute a stub to
//! simulate tool-present/tool-absent deterministically.

use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Hard timeout for one tool invocation.
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Capability for counting reads in an aligned-reads file.
///
/// Unavailability is a recoverable, non-fatal condition: implementations
/// return `None` on any failure and the caller leaves the enrichment
/// fields absent without downgrading the file's status.
pub trait ReadCounter: Send + Sync {
    /// Tool name, for display.
    fn name(&self) -> &str;

    /// Total read count, or `None` when the tool is missing, errors out,
    /// or exceeds its timeout.
    fn total_reads(&self, path: &Path) -> Option<u64>;
}

/// Production counter backed by `samtools flagstat`.
pub struct SamtoolsReadCounter {
    timeout: Duration,
}

impl SamtoolsReadCounter {
    /// Counter with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: TOOL_TIMEOUT,
        }
    }

    /// Counter with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SamtoolsReadCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadCounter for SamtoolsReadCounter {
    fn name(&self) -> &str {
        "samtools flagstat"
    }

    fn total_reads(&self, path: &Path) -> Option<u64> {
        let mut cmd = Command::new("samtools");
        cmd.arg("flagstat").arg(path);

        let (status, stdout) = run_with_timeout(cmd, self.timeout)?;
        if !status.success() {
            return None;
        }

        parse_flagstat_total(&stdout)
    }
}

/// Fixed-response counter for tests.
pub struct StubReadCounter {
    reads: Option<u64>,
}

impl StubReadCounter {
    /// A stub that reports the given total.
    pub fn reporting(reads: u64) -> Self {
        Self { reads: Some(reads) }
    }

    /// A stub that behaves like a missing tool.
    pub fn unavailable() -> Self {
        Self { reads: None }
    }
}

impl ReadCounter for StubReadCounter {
    fn name(&self) -> &str {
        "stub"
    }

    fn total_reads(&self, _path: &Path) -> Option<u64> {
        self.reads
    }
}

/// First summary line of flagstat output: `<total> + <failed> in total ...`.
fn parse_flagstat_total(stdout: &str) -> Option<u64> {
    stdout
        .lines()
        .next()?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

/// Run a command, killing it when the deadline passes.
///
/// Returns `None` on spawn failure or timeout. stdout is drained on a
/// separate thread so a chatty child cannot deadlock against a full pipe.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Option<(ExitStatus, String)> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let mut stdout_pipe = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut buf = String::new();
        let _ = stdout_pipe.read_to_string(&mut buf);
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                thread::sleep(Duration::from_millis(25));
            }
            Err(_) => return None,
        }
    };

    let stdout = reader.join().ok()?;
    Some((status, stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flagstat_total() {
        let stdout = "2500 + 0 in total (QC-passed reads + QC-failed reads)\n\
                      0 + 0 secondary\n";
        assert_eq!(parse_flagstat_total(stdout), Some(2500));
    }

    #[test]
    fn test_parse_flagstat_garbage() {
        assert_eq!(parse_flagstat_total(""), None);
        assert_eq!(parse_flagstat_total("not a number here\n"), None);
    }

    #[test]
    fn test_stub_counter() {
        let present = StubReadCounter::reporting(42);
        assert_eq!(present.total_reads(Path::new("x.bam")), Some(42));

        let absent = StubReadCounter::unavailable();
        assert_eq!(absent.total_reads(Path::new("x.bam")), None);
    }

    #[test]
    fn test_timeout_kills_slow_command() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = Instant::now();
        let result = run_with_timeout(cmd, Duration::from_millis(100));
        assert!(result.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_missing_binary_is_none() {
        let cmd = Command::new("definitely-not-a-real-binary-seqgate");
        assert!(run_with_timeout(cmd, Duration::from_secs(1)).is_none());
    }
}
