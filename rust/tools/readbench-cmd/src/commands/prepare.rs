//! Prepare command: create the file set only

use anyhow::{Context, Result};
use readbench::BenchmarkConfig;

use super::create_file_set;

pub fn run(config: BenchmarkConfig) -> Result<()> {
    config.validate().context("Invalid benchmark configuration")?;
    let files = create_file_set(&config)?;
    println!(
        "Created {} files of {} bytes in {}",
        files.len(),
        files.file_size(),
        files.dir().display()
    );
    Ok(())
}
