//! Corporate-action adjustment: factor table, law classification, rewrite.
//!
//! The factor table is an external reference (one row per security per day).
//! A security whose factor never changes across the sample window has
//! `law = true` and its files are copied raw; otherwise every day is
//! rescaled through the codec's adjustment-aware encode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use taq_codec::{read_series, write_series_adjusted};
use taq_core::{AdjustConfig, AdjustmentFactors, Error, Result};

/// One factor-table row: a security's adjustment factors on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub size_factor: f64,
    pub price_factor: f64,
}

/// Per-security, per-day adjustment factor lookup with law classification.
///
/// Read-only after construction; safe to share across workers.
#[derive(Debug, Clone)]
pub struct FactorTable {
    /// Factor history per ticker, sorted by date.
    by_ticker: HashMap<String, Vec<(NaiveDate, AdjustmentFactors)>>,
    /// True when the ticker's factors are constant across the sample.
    laws: HashMap<String, bool>,
}

impl FactorTable {
    /// Build the table and classify each ticker.
    ///
    /// Law rule: the mean factor across all days is compared to the first
    /// day's factor within tolerance, for size and price factors both.
    pub fn new(rows: Vec<FactorRow>, config: &AdjustConfig) -> Self {
        let mut by_ticker: HashMap<String, Vec<(NaiveDate, AdjustmentFactors)>> = HashMap::new();
        for row in rows {
            by_ticker.entry(row.ticker).or_default().push((
                row.date,
                AdjustmentFactors {
                    size_factor: row.size_factor,
                    price_factor: row.price_factor,
                },
            ));
        }
        for history in by_ticker.values_mut() {
            history.sort_by_key(|(date, _)| *date);
        }

        let laws = by_ticker
            .iter()
            .map(|(ticker, history)| {
                let n = history.len() as f64;
                let size_mean = history.iter().map(|(_, f)| f.size_factor).sum::<f64>() / n;
                let price_mean = history.iter().map(|(_, f)| f.price_factor).sum::<f64>() / n;
                let (_, first) = history[0];
                let law = config.is_close(size_mean, first.size_factor)
                    && config.is_close(price_mean, first.price_factor);
                (ticker.clone(), law)
            })
            .collect();

        Self { by_ticker, laws }
    }

    /// Load rows from a JSON array file.
    pub fn from_json_file(path: &Path, config: &AdjustConfig) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let rows: Vec<FactorRow> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::new(rows, config))
    }

    /// Whether the ticker's factor is constant across the sample window.
    /// Unknown tickers default to true (nothing to rescale).
    pub fn law(&self, ticker: &str) -> bool {
        self.laws.get(ticker).copied().unwrap_or(true)
    }

    /// Factors for one security on one day; unit factors when absent.
    pub fn factors(&self, ticker: &str, date: NaiveDate) -> AdjustmentFactors {
        self.by_ticker
            .get(ticker)
            .and_then(|history| {
                history
                    .iter()
                    .find(|(d, _)| *d == date)
                    .map(|(_, factors)| *factors)
            })
            .unwrap_or_default()
    }

    /// Tickers that need per-day rescaling.
    pub fn tickers_needing_adjustment(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = self
            .laws
            .iter()
            .filter(|(_, &law)| !law)
            .map(|(ticker, _)| ticker.as_str())
            .collect();
        tickers.sort_unstable();
        tickers
    }
}

/// Adjust one file: raw copy when the ticker's factor is constant, otherwise
/// decode, rescale through the adjustment-aware encode, and rewrite.
pub fn adjust_file(
    table: &FactorTable,
    ticker: &str,
    date: NaiveDate,
    source: &Path,
    dest: &Path,
) -> Result<()> {
    if table.law(ticker) {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        std::fs::copy(source, dest).map_err(|e| {
            // Blame whichever side failed: a readable source means the
            // destination did.
            let path = if source.is_file() { dest } else { source };
            Error::io(path, e)
        })?;
        debug!(ticker, %date, "constant factor, copied raw");
        return Ok(());
    }

    let factors = table.factors(ticker, date);
    let series = read_series(source)?;
    write_series_adjusted(dest, &series, factors)?;
    debug!(
        ticker,
        %date,
        size_factor = factors.size_factor,
        price_factor = factors.price_factor,
        "rescaled through adjusted encode"
    );
    Ok(())
}
