//! The open/read/close iteration loop.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use readbench_common::{Result, error::Error};
use readbench_io::{ChunkedReader, DirectIoOpener, FileOpener, PlatformOpener, ReadMode};

use crate::{
    config::BenchmarkConfig, fixture::FileSet, permutation::FilePermutation,
    stats::RunStatistics, throttle::RateLimiter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Drives `iterations` rounds of open, read, close over a file set.
///
/// A run either completes every iteration or aborts on the first fatal error
/// (open failure after fallback, read error, partial read). Statistics are
/// only returned for completed runs. An engine runs once.
pub struct IterationEngine<O = PlatformOpener> {
    config: BenchmarkConfig,
    opener: DirectIoOpener<O>,
    state: EngineState,
}

impl IterationEngine<PlatformOpener> {
    pub fn new(config: BenchmarkConfig) -> Result<IterationEngine<PlatformOpener>> {
        IterationEngine::with_opener(config, PlatformOpener)
    }
}

impl<O: FileOpener> IterationEngine<O> {
    /// Creates an engine that opens files through `opener`.
    ///
    /// Fails with `InvalidArgument` if `config` does not validate.
    pub fn with_opener(config: BenchmarkConfig, opener: O) -> Result<IterationEngine<O>> {
        config.validate()?;
        let opener = DirectIoOpener::with_opener(opener, config.io_mode);
        Ok(IterationEngine {
            config,
            opener,
            state: EngineState::Idle,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn run(&mut self) -> Result<RunStatistics> {
        if self.state != EngineState::Idle {
            return Err(Error::invalid_operation(format!(
                "run on {:?} engine",
                self.state
            )));
        }
        self.state = EngineState::Running;
        match self.run_iterations() {
            Ok(stats) => {
                self.state = EngineState::Completed;
                Ok(stats)
            }
            Err(e) => {
                self.state = EngineState::Aborted;
                tracing::error!(error = %e, "benchmark aborted");
                Err(e)
            }
        }
    }

    fn run_iterations(&self) -> Result<RunStatistics> {
        let config = &self.config;
        let permutation =
            FilePermutation::generate(config.file_count, config.access_order, config.seed);
        if permutation.is_empty() {
            tracing::warn!("file set is empty, skipping {} iterations", config.iterations);
            return Ok(RunStatistics::default());
        }

        let file_size = config.aligned_file_size()?;
        let mut reader = ChunkedReader::new(
            config.read_mode,
            config.chunk_size,
            config.alignment,
            file_size,
        )?;
        // Indexed by `file index - 1`.
        let paths: Vec<PathBuf> = (1..=config.file_count)
            .map(|index| FileSet::file_path(&config.dir, index))
            .collect();
        let mut limiter = match config.read_mode {
            ReadMode::Skip => None,
            ReadMode::Sequential | ReadMode::Parallel => {
                RateLimiter::per_second(config.rate_limit_bytes_per_second)
            }
        };
        let progress_every = config.progress_every();

        tracing::info!(
            iterations = config.iterations,
            files = config.file_count,
            file_size,
            chunk_size = config.chunk_size,
            read_mode = %config.read_mode,
            io_mode = %config.io_mode,
            rate_limit = config.rate_limit_bytes_per_second,
            "starting iterations"
        );

        let mut stats = RunStatistics::default();
        let start = Instant::now();
        let mut last_report = (start, 0u64);
        for i in 0..config.iterations {
            let index = permutation
                .for_iteration(i)
                .ok_or_else(|| Error::invalid_operation("empty permutation"))?;
            let path = &paths[index - 1];

            let file = self.opener.open(path)?;
            stats.opens += 1;
            if file.fell_back() {
                stats.buffered_fallbacks += 1;
            }

            if let Some(limiter) = limiter.as_mut() {
                stats.throttled += limiter.wait_for_allowance(file_size);
            }
            // On error `file` is dropped, closing the descriptor before the
            // error propagates.
            let outcome = reader.read_all(&file, file_size)?;
            tracing::trace!(iteration = i, path = %path.display(), bytes = outcome.bytes, mode = %file.mode());
            file.close();
            stats.closes += 1;

            stats.iterations += 1;
            stats.bytes_read += outcome.bytes;
            stats.chunk_reads += outcome.chunk_reads;

            if (i + 1) % progress_every == 0 {
                let now = Instant::now();
                let (last_time, last_bytes) = last_report;
                tracing::info!(
                    total_mib_s = %format!("{:.2}", mib_per_sec(stats.bytes_read, now - start)),
                    recent_mib_s = %format!(
                        "{:.2}",
                        mib_per_sec(stats.bytes_read - last_bytes, now - last_time)
                    ),
                    "completed iteration {} / {}",
                    i + 1,
                    config.iterations
                );
                last_report = (now, stats.bytes_read);
            }
        }
        stats.elapsed = start.elapsed();

        tracing::info!(
            iterations = stats.iterations,
            bytes_read = stats.bytes_read,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            throttled_ms = stats.throttled.as_millis() as u64,
            buffered_fallbacks = stats.buffered_fallbacks,
            "iterations completed"
        );
        Ok(stats)
    }
}

fn mib_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    bytes as f64 / secs / (1024.0 * 1024.0)
}
