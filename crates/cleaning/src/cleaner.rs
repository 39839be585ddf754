//! File-to-file cleaning pipeline.
//!
//! Orchestrates codec and detector per file: decode the source, derive the
//! price sequence to test (trade price, or quote mid), flag outliers, retain
//! the non-flagged records across every parallel array, and re-encode.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use taq_codec::{read_series, write_series};
use taq_core::{CleanConfig, Error, Result, TickSeries};

use crate::outlier::OutlierDetector;

/// Outcome of cleaning one series, for data-quality auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    /// Record count before cleaning.
    pub total: usize,
    /// Number of flagged records.
    pub flagged: usize,
    /// `flagged / total` (0 for an empty series).
    pub outlier_fraction: f64,
}

/// Staged cleaner for one decoded series.
///
/// Prices must be processed before detection, and detection must run before
/// a cleaned series can be produced; out-of-order calls surface a
/// precondition error rather than silently defaulting.
pub struct Cleaner {
    series: TickSeries,
    prices: Option<Vec<f64>>,
    outliers: Option<Vec<usize>>,
}

impl Cleaner {
    /// Wrap an already-decoded series.
    pub fn new(series: TickSeries) -> Self {
        Self {
            series,
            prices: None,
            outliers: None,
        }
    }

    /// Decode a source file and wrap it.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(read_series(path)?))
    }

    /// The source series.
    #[inline]
    pub fn series(&self) -> &TickSeries {
        &self.series
    }

    /// Derive the price sequence to test: trade prices directly, quote mid
    /// prices per tick. Idempotent.
    pub fn process_prices(&mut self) -> &[f64] {
        if self.prices.is_none() {
            let prices = self.series.test_prices();
            self.prices = Some(prices);
        }
        match &self.prices {
            Some(p) => p,
            None => &[],
        }
    }

    /// Run outlier detection over the processed prices.
    pub fn detect_outliers(&mut self, config: &CleanConfig) -> Result<&[usize]> {
        let prices = self.prices.as_deref().ok_or_else(|| {
            Error::precondition("prices must be processed before outlier detection")
        })?;
        let detector = OutlierDetector::new(config.clone())?;
        let flagged = detector.detect(prices)?;
        Ok(self.outliers.insert(flagged).as_slice())
    }

    /// Flagged indices from the last detection run.
    pub fn outlier_indices(&self) -> Result<&[usize]> {
        self.outliers
            .as_deref()
            .ok_or_else(|| Error::precondition("outliers must be detected first"))
    }

    /// Cleaning outcome metrics.
    pub fn report(&self) -> Result<CleanReport> {
        let flagged = self.outlier_indices()?.len();
        let total = self.series.len();
        let outlier_fraction = if total == 0 {
            0.0
        } else {
            flagged as f64 / total as f64
        };
        Ok(CleanReport {
            total,
            flagged,
            outlier_fraction,
        })
    }

    /// Build the cleaned series: all parallel arrays retained at the same
    /// non-flagged index set, timestamps verbatim.
    pub fn cleaned_series(&self) -> Result<TickSeries> {
        let flagged = self.outlier_indices()?;
        let n = self.series.len();
        let mut keep = Vec::with_capacity(n - flagged.len());
        let mut next_flagged = flagged.iter().peekable();
        for i in 0..n {
            if next_flagged.peek() == Some(&&i) {
                next_flagged.next();
            } else {
                keep.push(i);
            }
        }
        Ok(self.series.retain_indices(&keep))
    }

    /// Encode the cleaned series to `dest` and return the report.
    pub fn write_cleaned(&self, dest: &Path) -> Result<CleanReport> {
        let cleaned = self.cleaned_series()?;
        write_series(dest, &cleaned)?;
        self.report()
    }
}

/// Clean one file end to end: decode, detect, filter, re-encode.
///
/// A decode failure aborts before anything is written; no partial output is
/// produced for that file.
pub fn clean_file(source: &Path, dest: &Path, config: &CleanConfig) -> Result<CleanReport> {
    let mut cleaner = Cleaner::from_file(source)?;
    cleaner.process_prices();
    cleaner.detect_outliers(config)?;
    let report = cleaner.write_cleaned(dest)?;
    if report.flagged > 0 {
        info!(
            source = %source.display(),
            total = report.total,
            flagged = report.flagged,
            outlier_fraction = report.outlier_fraction,
            "cleaned tick file"
        );
    } else {
        debug!(source = %source.display(), total = report.total, "no outliers flagged");
    }
    Ok(report)
}
