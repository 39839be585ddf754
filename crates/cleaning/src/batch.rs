//! Parallel batch cleaning over independent (security, day) files.
//!
//! Each file is processed on its own worker with no shared mutable state;
//! workers return immutable per-file outcomes that are merged
//! single-threaded after the pool completes. A failing file never stops the
//! rest of the run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use taq_core::{BatchConfig, CleanConfig, Error, Result};

use crate::cleaner::{clean_file, CleanReport};

/// One unit of work: clean `source` into `dest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanJob {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Merged outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-file reports for files that cleaned successfully.
    pub completed: Vec<(PathBuf, CleanReport)>,
    /// Source path and error description for each failed file.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of files cleaned successfully.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Number of files that failed.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total records flagged across the run.
    pub fn total_flagged(&self) -> usize {
        self.completed.iter().map(|(_, r)| r.flagged).sum()
    }
}

/// Batch runner owning the pool and cleaning configuration.
pub struct BatchRunner {
    batch: BatchConfig,
    clean: CleanConfig,
}

/// Per-file outcome returned by a worker.
enum Outcome {
    Done(PathBuf, CleanReport),
    Failed(PathBuf, String),
}

impl BatchRunner {
    /// Create a runner. `BatchConfig::workers` of 0 uses the rayon default.
    pub fn new(batch: BatchConfig, clean: CleanConfig) -> Result<Self> {
        clean.validate()?;
        Ok(Self { batch, clean })
    }

    /// Clean every job in the work list, in parallel.
    ///
    /// Uses a local thread pool so concurrent runners can size their pools
    /// independently. Workers write to disjoint destination paths; the only
    /// merge happens here, after the pool has drained.
    pub fn run(&self, jobs: &[CleanJob]) -> Result<BatchReport> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if self.batch.workers > 0 {
            builder = builder.num_threads(self.batch.workers);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build thread pool: {e}")))?;

        let outcomes: Vec<Outcome> = pool.install(|| {
            jobs.par_iter()
                .map(|job| match clean_file(&job.source, &job.dest, &self.clean) {
                    Ok(report) => Outcome::Done(job.source.clone(), report),
                    Err(err) => {
                        warn!(source = %job.source.display(), error = %err, "cleaning failed");
                        Outcome::Failed(job.source.clone(), err.to_string())
                    }
                })
                .collect()
        });

        let mut report = BatchReport {
            completed: Vec::new(),
            failed: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Done(path, file_report) => report.completed.push((path, file_report)),
                Outcome::Failed(path, err) => report.failed.push((path, err)),
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use taq_codec::{read_series, write_series};
    use taq_core::{TickSeries, TradeSeries};

    fn spiked_file(path: &Path, spike_at: usize) {
        let n = 41;
        let mut prices = vec![10.0f32; n];
        prices[spike_at] = 9_999.0;
        let millis = (0..n as u32).map(|i| 34_200_000 + i * 250).collect();
        let series =
            TickSeries::Trade(TradeSeries::new(0, millis, vec![100; n], prices).unwrap());
        write_series(path, &series).unwrap();
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cleaned");

        let good_a = dir.path().join("A_trades.binRT");
        let good_b = dir.path().join("B_trades.binRT");
        let bad = dir.path().join("C_trades.binRT");
        spiked_file(&good_a, 20);
        spiked_file(&good_b, 5);
        std::fs::write(&bad, b"garbage, not gzip").unwrap();

        let jobs: Vec<CleanJob> = [&good_a, &good_b, &bad]
            .iter()
            .map(|src| CleanJob {
                source: src.to_path_buf(),
                dest: out.join(src.file_name().unwrap()),
            })
            .collect();

        let runner = BatchRunner::new(
            BatchConfig { workers: 2 },
            CleanConfig::default(),
        )
        .unwrap();
        let report = runner.run(&jobs).unwrap();

        assert_eq!(report.completed_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.total_flagged(), 2);
        assert_eq!(report.failed[0].0, bad);

        // Cleaned outputs exist and are re-readable; the failed file wrote
        // nothing.
        assert_eq!(read_series(&out.join("A_trades.binRT")).unwrap().len(), 40);
        assert_eq!(read_series(&out.join("B_trades.binRT")).unwrap().len(), 40);
        assert!(!out.join("C_trades.binRT").exists());
    }

    #[test]
    fn test_invalid_clean_config_rejected() {
        let res = BatchRunner::new(
            BatchConfig::default(),
            CleanConfig {
                window: 4,
                ..CleanConfig::default()
            },
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_empty_work_list() {
        let runner = BatchRunner::new(BatchConfig::default(), CleanConfig::default()).unwrap();
        let report = runner.run(&[]).unwrap();
        assert_eq!(report.completed_count(), 0);
        assert_eq!(report.failed_count(), 0);
    }
}
