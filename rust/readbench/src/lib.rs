//! File-read latency benchmark core.
//!
//! [`IterationEngine`] repeatedly opens, reads and closes the files of a
//! [`FileSet`](fixture::FileSet) in the order given by a [`FilePermutation`],
//! optionally bypassing the page cache, and reports [`RunStatistics`].
//!
//! ```no_run
//! use readbench::{BenchmarkConfig, IterationEngine, fixture::FileSet};
//!
//! let config = BenchmarkConfig {
//!     file_count: 3,
//!     file_size: 4096,
//!     iterations: 9,
//!     ..Default::default()
//! };
//! FileSet::prepare_dir(&config.dir)?;
//! let files = FileSet::create(&config.dir, config.file_count, config.aligned_file_size()?, config.file_content)?;
//! let stats = IterationEngine::new(config)?.run()?;
//! println!("{stats}");
//! files.remove()?;
//! # Ok::<(), readbench_common::error::Error>(())
//! ```

pub mod config;
pub mod engine;
pub mod fixture;
pub mod permutation;
pub mod stats;
pub mod throttle;

pub use config::BenchmarkConfig;
pub use engine::{EngineState, IterationEngine};
pub use permutation::{AccessOrder, FilePermutation};
pub use stats::RunStatistics;
pub use throttle::RateLimiter;

pub use readbench_io::{IoMode, ReadMode};
