//! Read command: benchmark an existing file set

use anyhow::{Context, Result};
use readbench::{BenchmarkConfig, fixture::FileSet};

use super::{maybe_drop_caches, print_parameters, print_report, run_benchmark};

pub fn run(config: BenchmarkConfig) -> Result<()> {
    config.validate().context("Invalid benchmark configuration")?;
    print_parameters(&config)?;

    FileSet::existing(&config.dir, config.file_count, config.aligned_file_size()?)
        .verify()
        .with_context(|| {
            format!(
                "{} does not hold the expected file set (run `prepare` first)",
                config.dir.display()
            )
        })?;
    maybe_drop_caches(&config);

    let stats = run_benchmark(config)?;
    print_report(&stats);
    Ok(())
}
