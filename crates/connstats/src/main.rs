mod bootstrap;

use anyhow::Result;
use clap::Parser;
use connstats_core::settings::Settings;
use connstats_data::export::write_csv;
use connstats_data::reader::{find_log_files, TextEncoding};
use connstats_runtime::coordinator::AggregationCoordinator;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::ensure_output_dir(&settings.output_directory)?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("connstats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input directory: {}, output directory: {}, workers: {}",
        settings.input_directory.display(),
        settings.output_directory.display(),
        settings.workers
    );

    let encoding = TextEncoding::from_name(&settings.encoding)
        .ok_or_else(|| anyhow::anyhow!("Unsupported encoding: {}", settings.encoding))?;

    let files = find_log_files(&settings.input_directory);
    if files.is_empty() {
        tracing::warn!(
            "No input files found in {}",
            settings.input_directory.display()
        );
    }

    let start = std::time::Instant::now();

    let coordinator = AggregationCoordinator::new(settings.workers, encoding);
    let (store, report) = coordinator.run(files).await;

    for (path, reason) in &report.failures {
        tracing::warn!("Skipped {}: {}", path.display(), reason);
    }

    let output_path = settings.output_directory.join("AllConnections.csv");
    write_csv(&store, &output_path)?;

    tracing::info!(
        "Processed {} files ({} skipped): {} lines read, {} parse failures, \
         {} records retained, {} discarded, {} unique connections",
        report.files_processed,
        report.files_skipped,
        report.totals.lines_read,
        report.totals.parse_failures,
        report.totals.records_retained,
        report.totals.records_discarded,
        store.len()
    );
    tracing::info!(
        "Total job execution time: {:.2}s",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
