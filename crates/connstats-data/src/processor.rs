//! Per-file processing pipeline.
//!
//! Drives one log file end-to-end: read lines → parse → validate → fold
//! into a local [`ConnectionStore`], attributing every retained record to
//! the file's resolved calendar date. Parse failures and discarded
//! records are counted, never fatal; the file's date being unresolvable
//! is the only error that rejects the file as a whole.

use std::io;
use std::path::Path;

use chrono::NaiveDate;
use connstats_core::error::Result;
use connstats_core::filedate::FileDateResolver;
use connstats_core::parser::{LineOutcome, RecordParser};
use connstats_core::validator::validate;
use tracing::{debug, warn};

use crate::reader::{open_lines, TextEncoding};
use crate::store::ConnectionStore;

// ── FileReport ────────────────────────────────────────────────────────────────

/// Per-file observability counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Total lines read, candidates or not.
    pub lines_read: u64,
    /// Candidate lines that failed the teardown grammar.
    pub parse_failures: u64,
    /// Records that passed validation and were folded.
    pub records_retained: u64,
    /// Records dropped by the validator.
    pub records_discarded: u64,
    /// I/O errors encountered mid-stream (at most one; reading stops).
    pub read_errors: u64,
}

impl FileReport {
    /// Add another report's counters to this one.
    pub fn absorb(&mut self, other: &FileReport) {
        self.lines_read += other.lines_read;
        self.parse_failures += other.parse_failures;
        self.records_retained += other.records_retained;
        self.records_discarded += other.records_discarded;
        self.read_errors += other.read_errors;
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Fold every retained record from `lines` into a fresh local store.
///
/// Processing continues to end-of-stream past unmatched lines and
/// discarded records. A mid-stream I/O error stops the file; whatever
/// was folded before it is kept.
pub fn process_lines(
    lines: impl IntoIterator<Item = io::Result<String>>,
    file_date: NaiveDate,
    parser: &RecordParser,
) -> (ConnectionStore, FileReport) {
    let mut store = ConnectionStore::new();
    let mut report = FileReport::default();

    for line in lines {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Read error after {} lines: {}", report.lines_read, e);
                report.read_errors += 1;
                break;
            }
        };
        report.lines_read += 1;

        match parser.parse_line(&line) {
            LineOutcome::NotCandidate => continue,
            LineOutcome::ParseFailure => {
                debug!("Teardown grammar did not match line {}", report.lines_read);
                report.parse_failures += 1;
            }
            LineOutcome::Record(record) => {
                if validate(&record).is_valid() {
                    store.fold(record.key(), file_date, record.bytes);
                    report.records_retained += 1;
                } else {
                    report.records_discarded += 1;
                }
            }
        }
    }

    (store, report)
}

/// Process one log file end-to-end.
///
/// Resolves the file's date, opens the (possibly gzipped) line stream
/// and runs [`process_lines`]. Errors here reject the whole file; the
/// caller reports them and moves on.
pub fn process_file(
    path: &Path,
    parser: &RecordParser,
    resolver: &FileDateResolver,
    encoding: TextEncoding,
) -> Result<(ConnectionStore, FileReport)> {
    let file_date = resolver.resolve(path)?;
    let lines = open_lines(path, encoding)?;

    let (store, report) = process_lines(lines, file_date, parser);

    debug!(
        "File {}: {} read, {} parse failures, {} retained, {} discarded",
        path.display(),
        report.lines_read,
        report.parse_failures,
        report.records_retained,
        report.records_discarded,
    );

    Ok((store, report))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use connstats_core::models::{ConnectionKey, ConnectionType};
    use std::io::Write;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn teardown_line(conntype: &str, target: &str, duration: &str, bytes: u64) -> String {
        format!(
            "Oct 10 23:59:59 fw01.example.net : Oct 10 23:59:59 CEST: %ASA-6-302014: \
             Teardown {conntype} connection 1234567 for outside:198.51.100.23/443 \
             to {target} duration {duration} bytes {bytes} TCP FINs"
        )
    }

    fn ok_lines(lines: &[String]) -> Vec<io::Result<String>> {
        lines.iter().map(|l| Ok(l.clone())).collect()
    }

    fn sample_key() -> ConnectionKey {
        ConnectionKey {
            source_ip: "198.51.100.23".to_string(),
            source_zone: "outside".to_string(),
            target_ip: "10.1.2.3".to_string(),
            target_zone: "inside".to_string(),
            target_port: "52345".to_string(),
            connection_type: ConnectionType::Tcp,
        }
    }

    // ── process_lines ─────────────────────────────────────────────────────────

    #[test]
    fn test_retained_records_are_folded() {
        let parser = RecordParser::new();
        let lines = ok_lines(&[
            teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 100),
            teardown_line("TCP", "inside:10.1.2.3/52345", "0:00:10", 50),
        ]);

        let (store, report) = process_lines(lines, date("2021-01-01"), &parser);

        assert_eq!(report.lines_read, 2);
        assert_eq!(report.records_retained, 2);
        assert_eq!(report.parse_failures, 0);
        let stats = store.get(&sample_key()).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_bytes, 150);
        assert_eq!(stats.first_seen, date("2021-01-01"));
    }

    #[test]
    fn test_noise_lines_are_counted_but_ignored() {
        let parser = RecordParser::new();
        let lines = ok_lines(&[
            "Oct 10 23:59:59 fw01 : %ASA-6-302013: Built outbound TCP connection".to_string(),
            teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 100),
            String::new(),
        ]);

        let (store, report) = process_lines(lines, date("2021-01-01"), &parser);

        assert_eq!(report.lines_read, 3);
        assert_eq!(report.records_retained, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_truncated_teardown_line_is_a_parse_failure() {
        let parser = RecordParser::new();
        let lines = ok_lines(&[
            "Oct 10 23:59:59 fw01 : %ASA-6-302014: Teardown TCP connection".to_string(),
        ]);

        let (store, report) = process_lines(lines, date("2021-01-01"), &parser);

        // A parse failure has zero effect on the store and does not abort.
        assert_eq!(report.parse_failures, 1);
        assert_eq!(report.records_retained, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_records_are_discarded() {
        let parser = RecordParser::new();
        let lines = ok_lines(&[
            // Zero bytes.
            teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 0),
            // UDP DNS timeout artifact.
            teardown_line("UDP", "inside:10.1.2.3/53", "0:02:00", 123),
            // Retained.
            teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 99),
        ]);

        let (store, report) = process_lines(lines, date("2021-01-01"), &parser);

        assert_eq!(report.records_discarded, 2);
        assert_eq!(report.records_retained, 1);
        assert_eq!(store.get(&sample_key()).unwrap().total_bytes, 99);
    }

    #[test]
    fn test_read_error_stops_the_file_but_keeps_partial_store() {
        let parser = RecordParser::new();
        let lines = vec![
            Ok(teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 100)),
            Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt gzip stream")),
            Ok(teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 50)),
        ];

        let (store, report) = process_lines(lines, date("2021-01-01"), &parser);

        assert_eq!(report.read_errors, 1);
        assert_eq!(report.records_retained, 1);
        assert_eq!(store.get(&sample_key()).unwrap().total_bytes, 100);
    }

    // ── process_file ──────────────────────────────────────────────────────────

    #[test]
    fn test_process_file_uses_file_name_date() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host_2021-01-05.log");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", teardown_line("TCP", "inside:10.1.2.3/52345", "0:01:02", 100)).unwrap();

        let (store, report) = process_file(
            &path,
            &RecordParser::new(),
            &FileDateResolver::new(),
            TextEncoding::Latin1,
        )
        .unwrap();

        assert_eq!(report.records_retained, 1);
        let stats = store.get(&sample_key()).unwrap();
        assert_eq!(stats.first_seen, date("2021-01-05"));
        assert_eq!(stats.last_seen, date("2021-01-05"));
    }

    #[test]
    fn test_process_file_rejects_dateless_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("teardown.log");
        std::fs::write(&path, "irrelevant").unwrap();

        let err = process_file(
            &path,
            &RecordParser::new(),
            &FileDateResolver::new(),
            TextEncoding::Latin1,
        )
        .unwrap_err();

        assert!(err.to_string().contains("logfile date"));
    }

    // ── FileReport ────────────────────────────────────────────────────────────

    #[test]
    fn test_report_absorb() {
        let mut total = FileReport {
            lines_read: 10,
            parse_failures: 1,
            records_retained: 5,
            records_discarded: 2,
            read_errors: 0,
        };
        total.absorb(&FileReport {
            lines_read: 3,
            parse_failures: 0,
            records_retained: 2,
            records_discarded: 1,
            read_errors: 1,
        });

        assert_eq!(total.lines_read, 13);
        assert_eq!(total.parse_failures, 1);
        assert_eq!(total.records_retained, 7);
        assert_eq!(total.records_discarded, 3);
        assert_eq!(total.read_errors, 1);
    }
}
