//! Command implementations for readbench-cmd

use std::time::Instant;

use anyhow::{Context, Result};
use readbench::{BenchmarkConfig, IterationEngine, RunStatistics, fixture::FileSet};

use crate::utils::format_size;

pub mod prepare;
pub mod read;
pub mod run;

fn print_parameters(config: &BenchmarkConfig) -> Result<()> {
    println!("Parameters:");
    println!("  N (number of files): {}", config.file_count);
    println!(
        "  K (file size): {} (aligned to {})",
        config.file_size,
        config.aligned_file_size()?
    );
    println!("  ITER (iterations): {}", config.iterations);
    println!("  PATH (directory): {}", config.dir.display());
    println!("  chunk size: {}", config.chunk_size);
    println!("  read mode: {}", config.read_mode);
    println!("  I/O mode: {}", config.io_mode);
    if config.rate_limit_bytes_per_second > 0 {
        println!(
            "  rate limit: {}/s",
            format_size(config.rate_limit_bytes_per_second)
        );
    } else {
        println!("  rate limit: unlimited");
    }
    println!();
    Ok(())
}

/// Recreates the benchmark directory and writes the file set.
fn create_file_set(config: &BenchmarkConfig) -> Result<FileSet> {
    FileSet::prepare_dir(&config.dir)
        .with_context(|| format!("Failed to prepare {}", config.dir.display()))?;

    let start = Instant::now();
    let files = FileSet::create(
        &config.dir,
        config.file_count,
        config.aligned_file_size()?,
        config.file_content,
    )
    .context("Failed to create benchmark files")?;
    if files.is_empty() {
        tracing::warn!("file count is zero, no files created");
    }
    tracing::info!(
        files = files.len(),
        size = %format_size(files.file_size()),
        content = ?config.file_content,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "created file set"
    );
    Ok(files)
}

fn maybe_drop_caches(config: &BenchmarkConfig) {
    if !config.drop_caches {
        return;
    }
    match readbench_io::cache::drop_page_cache() {
        Ok(()) => tracing::info!("dropped page cache"),
        Err(e) => tracing::warn!(error = %e, "failed to drop page cache, reads may hit a warm cache"),
    }
}

fn run_benchmark(config: BenchmarkConfig) -> Result<RunStatistics> {
    let mut engine =
        IterationEngine::new(config).context("Invalid benchmark configuration")?;
    let stats = engine.run().context("Benchmark aborted")?;
    Ok(stats)
}

fn print_report(stats: &RunStatistics) {
    println!();
    println!("{stats}");
    println!("Data read: {}", format_size(stats.bytes_read));
}
