use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── ConnectionType ────────────────────────────────────────────────────────────

/// Transport protocol of a teardown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionType {
    Tcp,
    Udp,
}

impl ConnectionType {
    /// Parse the protocol token captured from a teardown line.
    ///
    /// Returns `None` for anything other than the exact tokens `"TCP"`
    /// and `"UDP"` — a different token means the line does not describe
    /// a session teardown this tool understands.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TCP" => Some(Self::Tcp),
            "UDP" => Some(Self::Udp),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

// ── ParsedRecord ──────────────────────────────────────────────────────────────

/// One matched session-teardown log line.
///
/// Zones, IPs and ports are carried verbatim as captured — no case
/// folding, no numeric normalisation. Produced by the parser, consumed
/// immediately by the validator; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Year-less syslog timestamp, e.g. `"Oct 10 23:59:59"`.
    pub timestamp: String,
    /// Transport protocol of the torn-down session.
    pub connection_type: ConnectionType,
    /// Firewall zone the connection originated from.
    pub source_zone: String,
    /// Source address as a dotted-quad string.
    pub source_ip: String,
    /// Source port, verbatim.
    pub source_port: String,
    /// Firewall zone the connection targeted.
    pub target_zone: String,
    /// Target address as a dotted-quad string.
    pub target_ip: String,
    /// Target port, verbatim.
    pub target_port: String,
    /// Session duration, hours component (unbounded in the log format).
    pub duration_hours: u32,
    /// Session duration, minutes component.
    pub duration_minutes: u32,
    /// Session duration, seconds component.
    pub duration_seconds: u32,
    /// Total bytes transferred during the session.
    pub bytes: u64,
    /// Trailing free-text teardown reason, e.g. `"TCP FINs"`.
    pub result: String,
}

impl ParsedRecord {
    /// Derive the aggregation identity for this record.
    pub fn key(&self) -> ConnectionKey {
        ConnectionKey {
            source_ip: self.source_ip.clone(),
            source_zone: self.source_zone.clone(),
            target_ip: self.target_ip.clone(),
            target_zone: self.target_zone.clone(),
            target_port: self.target_port.clone(),
            connection_type: self.connection_type,
        }
    }
}

// ── ConnectionKey ─────────────────────────────────────────────────────────────

/// The six-field identity that groups teardown events into one bucket.
///
/// Field order is the output contract: `Ord` and `Display` both follow
/// source IP, source zone, target IP, target zone, target port,
/// connection type. Equality is exact string/enum equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionKey {
    pub source_ip: String,
    pub source_zone: String,
    pub target_ip: String,
    pub target_zone: String,
    pub target_port: String,
    pub connection_type: ConnectionType,
}

impl fmt::Display for ConnectionKey {
    /// Renders the key as its semicolon-joined CSV prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{};{};{}",
            self.source_ip,
            self.source_zone,
            self.target_ip,
            self.target_zone,
            self.target_port,
            self.connection_type
        )
    }
}

// ── ConnectionStats ───────────────────────────────────────────────────────────

/// Accumulated statistics for one connection key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStats {
    /// Number of retained records folded into this entry.
    pub count: u64,
    /// Earliest file date a record for this key was observed on.
    pub first_seen: NaiveDate,
    /// Latest file date a record for this key was observed on.
    pub last_seen: NaiveDate,
    /// Sum of the byte counts of all retained records.
    pub total_bytes: u64,
}

impl ConnectionStats {
    /// Stats for the first retained record of a key.
    pub fn new(date: NaiveDate, bytes: u64) -> Self {
        Self {
            count: 1,
            first_seen: date,
            last_seen: date,
            total_bytes: bytes,
        }
    }

    /// Fold one further retained record into this entry.
    ///
    /// Files are not processed in date order, so both bounds are
    /// min/max comparisons rather than first/last writes.
    pub fn observe(&mut self, date: NaiveDate, bytes: u64) {
        self.count += 1;
        self.first_seen = self.first_seen.min(date);
        self.last_seen = self.last_seen.max(date);
        self.total_bytes += bytes;
    }

    /// Combine another already-aggregated entry into this one.
    pub fn merge(&mut self, other: &ConnectionStats) {
        self.count += other.count;
        self.first_seen = self.first_seen.min(other.first_seen);
        self.last_seen = self.last_seen.max(other.last_seen);
        self.total_bytes += other.total_bytes;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
