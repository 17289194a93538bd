//! Concurrent multi-file aggregation.
//!
//! A fixed pool of workers pulls file paths from a shared queue, runs the
//! per-file pipeline and merges each resulting local store into the
//! global one. Each merge holds the store lock for its whole duration, so
//! two files' updates to the same key can never interleave; together with
//! the commutative merge arithmetic this makes the final table
//! independent of worker count and scheduling order.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use connstats_core::filedate::FileDateResolver;
use connstats_core::parser::RecordParser;
use connstats_data::processor::{process_file, FileReport};
use connstats_data::reader::TextEncoding;
use connstats_data::store::ConnectionStore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Whole-run observability counters.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Files processed and merged into the global store.
    pub files_processed: u64,
    /// Files rejected (unresolvable date, unreadable) and skipped.
    pub files_skipped: u64,
    /// The skipped files with the reason each was rejected.
    pub failures: Vec<(PathBuf, String)>,
    /// Line-level counters summed across all processed files.
    pub totals: FileReport,
}

// ── AggregationCoordinator ────────────────────────────────────────────────────

/// Runs the per-file pipeline over a bounded worker pool.
pub struct AggregationCoordinator {
    workers: usize,
    encoding: TextEncoding,
}

impl AggregationCoordinator {
    /// Create a coordinator with `workers` parallel workers (minimum 1).
    pub fn new(workers: usize, encoding: TextEncoding) -> Self {
        Self {
            workers: workers.max(1),
            encoding,
        }
    }

    /// Process every file in `files` and return the merged global store.
    ///
    /// Completes only after every file has been taken from the queue,
    /// processed and merged exactly once. Rejected files are counted in
    /// the report; they never abort the run.
    pub async fn run(&self, files: Vec<PathBuf>) -> (ConnectionStore, RunReport) {
        let queue = Arc::new(Mutex::new(VecDeque::from(files)));
        let global = Arc::new(Mutex::new(ConnectionStore::new()));
        let report = Arc::new(Mutex::new(RunReport::default()));

        // Compiled once, shared by every worker.
        let parser = Arc::new(RecordParser::new());
        let resolver = Arc::new(FileDateResolver::new());

        let mut pool = JoinSet::new();
        for worker_id in 0..self.workers {
            let queue = Arc::clone(&queue);
            let global = Arc::clone(&global);
            let report = Arc::clone(&report);
            let parser = Arc::clone(&parser);
            let resolver = Arc::clone(&resolver);
            let encoding = self.encoding;

            pool.spawn_blocking(move || {
                worker_loop(worker_id, &queue, &parser, &resolver, encoding, &global, &report)
            });
        }

        // Barrier: the run is complete only once every worker has drained
        // the queue and returned.
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                warn!("Worker task failed: {}", e);
            }
        }

        let store = Arc::into_inner(global)
            .expect("all workers joined")
            .into_inner()
            .expect("global store lock poisoned");
        let report = Arc::into_inner(report)
            .expect("all workers joined")
            .into_inner()
            .expect("run report lock poisoned");

        (store, report)
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

/// One worker: pull a path, process it, merge the result; exit when the
/// queue is drained.
fn worker_loop(
    worker_id: usize,
    queue: &Mutex<VecDeque<PathBuf>>,
    parser: &RecordParser,
    resolver: &FileDateResolver,
    encoding: TextEncoding,
    global: &Mutex<ConnectionStore>,
    report: &Mutex<RunReport>,
) {
    loop {
        let next = queue.lock().expect("work queue lock poisoned").pop_front();
        let Some(path) = next else { break };

        debug!("Worker {} processing {}", worker_id, path.display());

        match process_file(&path, parser, resolver, encoding) {
            Ok((local, file_report)) => {
                let local_entries = local.len();
                let total_entries;
                {
                    // One lock per merge call keeps the merge indivisible.
                    let mut store = global.lock().expect("global store lock poisoned");
                    store.merge(local);
                    total_entries = store.len();
                }
                debug!(
                    "File done: {} - {} local entries, {} total entries",
                    path.display(),
                    local_entries,
                    total_entries
                );

                let mut run = report.lock().expect("run report lock poisoned");
                run.files_processed += 1;
                run.totals.absorb(&file_report);
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                let mut run = report.lock().expect("run report lock poisoned");
                run.files_skipped += 1;
                run.failures.push((path, e.to_string()));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
