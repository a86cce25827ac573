use std::time::Duration;

/// Aggregate results of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub iterations: u64,
    pub bytes_read: u64,
    /// Wall-clock time of the iteration loop, excluding setup.
    pub elapsed: Duration,
    pub opens: u64,
    pub closes: u64,
    pub chunk_reads: u64,
    /// Opens where direct I/O was rejected and buffered I/O was used instead.
    pub buffered_fallbacks: u64,
    /// Part of `elapsed` spent waiting on the read rate limit.
    pub throttled: Duration,
}

impl RunStatistics {
    /// Mean time per iteration; zero for a run without iterations.
    pub fn average_iteration_time(&self) -> Duration {
        if self.iterations == 0 {
            return Duration::ZERO;
        }
        let nanos = self.elapsed.as_nanos() / self.iterations as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    pub fn throughput_bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes_read as f64 / secs
    }
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Completed {} iterations in {:.3} ms",
            self.iterations,
            self.elapsed.as_secs_f64() * 1e3
        )?;
        writeln!(f, "Total bytes read: {}", self.bytes_read)?;
        writeln!(
            f,
            "Average time per iteration: {:.3} us",
            self.average_iteration_time().as_secs_f64() * 1e6
        )?;
        writeln!(
            f,
            "Throughput: {:.2} MiB/s",
            self.throughput_bytes_per_sec() / (1024.0 * 1024.0)
        )?;
        if !self.throttled.is_zero() {
            writeln!(
                f,
                "Throttled: {:.3} ms",
                self.throttled.as_secs_f64() * 1e3
            )?;
        }
        write!(
            f,
            "Opens: {}, closes: {}, chunk reads: {}, buffered fallbacks: {}",
            self.opens, self.closes, self.chunk_reads, self.buffered_fallbacks
        )
    }
}
