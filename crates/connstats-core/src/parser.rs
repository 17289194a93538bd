//! Teardown-line parsing.
//!
//! Turns one raw syslog line into a [`ParsedRecord`]. A cheap substring
//! pre-filter rejects the bulk of the traffic before the full grammar
//! match is attempted; the grammar itself is compiled once per parser.

use regex::Regex;

use crate::models::{ConnectionType, ParsedRecord};

/// Literal markers a line must contain to be worth a full match.
const CANDIDATE_MARKERS: [&str; 2] = ["Teardown TCP", "Teardown UDP"];

/// Cisco-ASA teardown event grammar.
///
/// Captures, in order: year-less syslog timestamp, hostname, relayed
/// timestamp, session id, connection type, connection id, source
/// zone/IP/port, target zone/IP/port, duration `H:MM:SS` (hours
/// unbounded), byte count and the trailing free-text result.
const TEARDOWN_PATTERN: &str = r"^(?P<datetime>\w+\s+\d+\s+\d+:\d+:\d+)\s(?P<hostname>\S+)\s:\s\w+\s\d+\s\d+:\d+:\d+\s\w+:\s(?P<session>\S+)\sTeardown\s(?P<conntype>\S+)\s\S+\s(?P<connid>\d+)\sfor\s(?P<srczone>\S+):(?P<srcip>\d+\.\d+\.\d+\.\d+)/(?P<srcport>\d+)(?:\(any\))*\sto\s(?P<tgtzone>\S+):(?P<tgtip>\d+\.\d+\.\d+\.\d+)/(?P<tgtport>\d+)(?:\(any\))*\sduration\s(?P<hours>\d+):(?P<minutes>\d+):(?P<seconds>\d+)\sbytes\s(?P<bytes>\d+)\s*(?P<result>.*)";

// ── LineOutcome ───────────────────────────────────────────────────────────────

/// Result of offering one raw line to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line matched the teardown grammar.
    Record(ParsedRecord),
    /// The line carries no teardown marker; no match was attempted.
    NotCandidate,
    /// The line carries a marker but did not match the grammar, or a
    /// captured numeric subfield was unusable.
    ParseFailure,
}

// ── RecordParser ──────────────────────────────────────────────────────────────

/// Parses raw syslog lines into [`ParsedRecord`]s.
///
/// Construct once and reuse across files — the grammar is compiled in
/// [`RecordParser::new`].
pub struct RecordParser {
    pattern: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(TEARDOWN_PATTERN).expect("teardown pattern must compile"),
        }
    }

    /// Returns `true` when `line` contains one of the teardown markers.
    pub fn is_candidate(&self, line: &str) -> bool {
        CANDIDATE_MARKERS.iter().any(|m| line.contains(m))
    }

    /// Offer one raw line to the parser.
    ///
    /// Non-candidate lines are skipped without a match attempt. Candidate
    /// lines that fail the grammar — or whose captured numbers do not fit
    /// their types — are parse failures, reported distinctly so the
    /// caller can count them.
    pub fn parse_line(&self, line: &str) -> LineOutcome {
        if !self.is_candidate(line) {
            return LineOutcome::NotCandidate;
        }

        let Some(caps) = self.pattern.captures(line) else {
            return LineOutcome::ParseFailure;
        };

        let Some(connection_type) = ConnectionType::from_token(&caps["conntype"]) else {
            return LineOutcome::ParseFailure;
        };

        let (Ok(duration_hours), Ok(duration_minutes), Ok(duration_seconds)) = (
            caps["hours"].parse::<u32>(),
            caps["minutes"].parse::<u32>(),
            caps["seconds"].parse::<u32>(),
        ) else {
            return LineOutcome::ParseFailure;
        };

        let Ok(bytes) = caps["bytes"].parse::<u64>() else {
            return LineOutcome::ParseFailure;
        };

        LineOutcome::Record(ParsedRecord {
            timestamp: caps["datetime"].to_string(),
            connection_type,
            source_zone: caps["srczone"].to_string(),
            source_ip: caps["srcip"].to_string(),
            source_port: caps["srcport"].to_string(),
            target_zone: caps["tgtzone"].to_string(),
            target_ip: caps["tgtip"].to_string(),
            target_port: caps["tgtport"].to_string(),
            duration_hours,
            duration_minutes,
            duration_seconds,
            bytes,
            result: caps["result"].to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
