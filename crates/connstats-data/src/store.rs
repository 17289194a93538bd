//! The connection aggregation store.
//!
//! Maps [`ConnectionKey`] → [`ConnectionStats`]. One instance serves two
//! roles: the *local* store a file processor folds records into
//! (single-writer), and the *global* store the coordinator merges local
//! stores into. Merge is the only cross-store operation.

use std::collections::btree_map::{self, BTreeMap};

use chrono::NaiveDate;
use connstats_core::models::{ConnectionKey, ConnectionStats};

// ── ConnectionStore ───────────────────────────────────────────────────────────

/// Keyed store of accumulated connection statistics.
///
/// Backed by a `BTreeMap` so iteration follows the key's output order —
/// the final table is identical no matter how many workers produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStore {
    entries: BTreeMap<ConnectionKey, ConnectionStats>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one retained record into the store.
    ///
    /// First record for a key creates its entry; every further record
    /// bumps the count, widens the first/last-seen window and adds the
    /// byte count.
    pub fn fold(&mut self, key: ConnectionKey, file_date: NaiveDate, bytes: u64) {
        match self.entries.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(ConnectionStats::new(file_date, bytes));
            }
            btree_map::Entry::Occupied(mut slot) => {
                slot.get_mut().observe(file_date, bytes);
            }
        }
    }

    /// Merge another store into this one.
    ///
    /// Per-key combine: counts and byte totals add, first-seen takes the
    /// minimum, last-seen the maximum; keys new to `self` are inserted
    /// verbatim. Equivalent to folding all of `other`'s underlying
    /// records here, in any order.
    pub fn merge(&mut self, other: ConnectionStore) {
        for (key, stats) in other.entries {
            match self.entries.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(stats);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    slot.get_mut().merge(&stats);
                }
            }
        }
    }

    /// Number of distinct connection keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ConnectionKey) -> Option<&ConnectionStats> {
        self.entries.get(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionKey, &ConnectionStats)> {
        self.entries.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
