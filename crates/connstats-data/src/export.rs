//! Canonical CSV rendering of the connection table.
//!
//! One row per key, semicolon-delimited, dates as `YYYY-MM-DD`. The key
//! renders its own six-column prefix, so a row is the key plus the four
//! statistic columns.

use std::path::Path;

use connstats_core::error::{ConnstatsError, Result};
use tracing::info;

use crate::store::ConnectionStore;

/// Header row; column order is the downstream compatibility contract.
pub const CSV_HEADER: &str =
    "SourceIP;SourceZone;TargetIP;TargetZone;TargetPort;ConnectionType;count;firstSeen;lastSeen;totalBytes";

/// Render the store as the canonical CSV document, rows in key order.
pub fn render_csv(store: &ConnectionStore) -> String {
    let mut out = String::with_capacity(64 * (store.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for (key, stats) in store.iter() {
        out.push_str(&format!(
            "{};{};{};{};{}\n",
            key,
            stats.count,
            stats.first_seen.format("%Y-%m-%d"),
            stats.last_seen.format("%Y-%m-%d"),
            stats.total_bytes,
        ));
    }

    out
}

/// Write the rendered table to `path`.
pub fn write_csv(store: &ConnectionStore, path: &Path) -> Result<()> {
    std::fs::write(path, render_csv(store)).map_err(|source| ConnstatsError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} connection rows to {}", store.len(), path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
