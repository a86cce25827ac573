//! Run command: setup, benchmark, teardown

use anyhow::{Context, Result};
use readbench::BenchmarkConfig;

use super::{create_file_set, maybe_drop_caches, print_parameters, print_report, run_benchmark};

pub fn run(config: BenchmarkConfig, keep_files: bool) -> Result<()> {
    config.validate().context("Invalid benchmark configuration")?;
    print_parameters(&config)?;

    let files = create_file_set(&config)?;
    maybe_drop_caches(&config);

    let result = run_benchmark(config);
    if keep_files {
        tracing::info!(dir = %files.dir().display(), "keeping benchmark files");
    } else if let Err(e) = files.remove() {
        tracing::warn!(error = %e, "failed to remove benchmark directory");
    }

    print_report(&result?);
    Ok(())
}
