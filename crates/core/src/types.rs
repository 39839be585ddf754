//! Decoded tick-series types for the TAQ processing workspace.
//!
//! One series corresponds to one (security, day) file. Series are immutable
//! after construction; derived series (cleaned, adjusted) are new objects.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Seconds from Unix epoch to local midnight of the trading day.
pub type EpochSecs = i32;

/// Milliseconds from midnight of the trading day.
pub type MillisFromMidnight = u32;

/// Which kind of tick record a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickKind {
    /// Trade prints (`*_trades.binRT`).
    Trade,
    /// Level 1 quotes (`*_quotes.binRQ`).
    Quote,
}

impl TickKind {
    /// Infer the record kind from the file naming convention.
    ///
    /// `*_trades.binRT` files hold trades, `*_quotes.binRQ` files hold
    /// quotes. Anything else is rejected: the codec has no way to guess a
    /// layout.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("binRT") => Ok(TickKind::Trade),
            Some("binRQ") => Ok(TickKind::Quote),
            _ => Err(Error::unsupported_type(format!(
                "cannot infer tick kind from path {}",
                path.display()
            ))),
        }
    }
}

/// Decoded trades for one security on one day.
///
/// All parallel arrays share the same length N; the constructor enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSeries {
    day_epoch_secs: EpochSecs,
    millis: Vec<MillisFromMidnight>,
    sizes: Vec<i32>,
    prices: Vec<f32>,
}

impl TradeSeries {
    /// Create a trade series, validating that all arrays share one length.
    pub fn new(
        day_epoch_secs: EpochSecs,
        millis: Vec<MillisFromMidnight>,
        sizes: Vec<i32>,
        prices: Vec<f32>,
    ) -> Result<Self> {
        let n = millis.len();
        if sizes.len() != n || prices.len() != n {
            return Err(Error::format(format!(
                "trade array lengths differ: millis={}, sizes={}, prices={}",
                n,
                sizes.len(),
                prices.len()
            )));
        }
        Ok(Self {
            day_epoch_secs,
            millis,
            sizes,
            prices,
        })
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.millis.len()
    }

    /// True if the series holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.millis.is_empty()
    }

    /// Seconds from epoch to midnight of the trading day.
    #[inline]
    pub fn day_epoch_secs(&self) -> EpochSecs {
        self.day_epoch_secs
    }

    /// Milliseconds from midnight for record `i`.
    #[inline]
    pub fn millis(&self, i: usize) -> MillisFromMidnight {
        self.millis[i]
    }

    /// Trade size for record `i`.
    #[inline]
    pub fn size(&self, i: usize) -> i32 {
        self.sizes[i]
    }

    /// Trade price for record `i`.
    #[inline]
    pub fn price(&self, i: usize) -> f32 {
        self.prices[i]
    }

    /// Absolute timestamp of record `i` in epoch milliseconds.
    #[inline]
    pub fn epoch_millis(&self, i: usize) -> i64 {
        self.day_epoch_secs as i64 * 1000 + self.millis[i] as i64
    }

    /// All timestamps.
    #[inline]
    pub fn millis_slice(&self) -> &[MillisFromMidnight] {
        &self.millis
    }

    /// All sizes.
    #[inline]
    pub fn sizes_slice(&self) -> &[i32] {
        &self.sizes
    }

    /// All prices.
    #[inline]
    pub fn prices_slice(&self) -> &[f32] {
        &self.prices
    }

    /// Trade prices widened to f64, the sequence the outlier filter tests.
    pub fn test_prices(&self) -> Vec<f64> {
        self.prices.iter().map(|&p| p as f64).collect()
    }

    /// New series retaining only the records at `keep` indices (ascending).
    ///
    /// Timestamps are carried over verbatim, never renumbered.
    pub fn retain_indices(&self, keep: &[usize]) -> Self {
        Self {
            day_epoch_secs: self.day_epoch_secs,
            millis: keep.iter().map(|&i| self.millis[i]).collect(),
            sizes: keep.iter().map(|&i| self.sizes[i]).collect(),
            prices: keep.iter().map(|&i| self.prices[i]).collect(),
        }
    }
}

/// Decoded Level 1 quotes for one security on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    day_epoch_secs: EpochSecs,
    millis: Vec<MillisFromMidnight>,
    bid_sizes: Vec<i32>,
    bid_prices: Vec<f32>,
    ask_sizes: Vec<i32>,
    ask_prices: Vec<f32>,
}

impl QuoteSeries {
    /// Create a quote series, validating that all arrays share one length.
    pub fn new(
        day_epoch_secs: EpochSecs,
        millis: Vec<MillisFromMidnight>,
        bid_sizes: Vec<i32>,
        bid_prices: Vec<f32>,
        ask_sizes: Vec<i32>,
        ask_prices: Vec<f32>,
    ) -> Result<Self> {
        let n = millis.len();
        if bid_sizes.len() != n
            || bid_prices.len() != n
            || ask_sizes.len() != n
            || ask_prices.len() != n
        {
            return Err(Error::format(format!(
                "quote array lengths differ: millis={}, bid_sizes={}, bid_prices={}, ask_sizes={}, ask_prices={}",
                n,
                bid_sizes.len(),
                bid_prices.len(),
                ask_sizes.len(),
                ask_prices.len()
            )));
        }
        Ok(Self {
            day_epoch_secs,
            millis,
            bid_sizes,
            bid_prices,
            ask_sizes,
            ask_prices,
        })
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.millis.len()
    }

    /// True if the series holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.millis.is_empty()
    }

    /// Seconds from epoch to midnight of the trading day.
    #[inline]
    pub fn day_epoch_secs(&self) -> EpochSecs {
        self.day_epoch_secs
    }

    /// Milliseconds from midnight for record `i`.
    #[inline]
    pub fn millis(&self, i: usize) -> MillisFromMidnight {
        self.millis[i]
    }

    /// Bid size for record `i`.
    #[inline]
    pub fn bid_size(&self, i: usize) -> i32 {
        self.bid_sizes[i]
    }

    /// Bid price for record `i`.
    #[inline]
    pub fn bid_price(&self, i: usize) -> f32 {
        self.bid_prices[i]
    }

    /// Ask size for record `i`.
    #[inline]
    pub fn ask_size(&self, i: usize) -> i32 {
        self.ask_sizes[i]
    }

    /// Ask price for record `i`.
    #[inline]
    pub fn ask_price(&self, i: usize) -> f32 {
        self.ask_prices[i]
    }

    /// Absolute timestamp of record `i` in epoch milliseconds.
    #[inline]
    pub fn epoch_millis(&self, i: usize) -> i64 {
        self.day_epoch_secs as i64 * 1000 + self.millis[i] as i64
    }

    /// Mid price for record `i`, computed in f64.
    #[inline]
    pub fn mid(&self, i: usize) -> f64 {
        0.5 * (self.bid_prices[i] as f64 + self.ask_prices[i] as f64)
    }

    /// All timestamps.
    #[inline]
    pub fn millis_slice(&self) -> &[MillisFromMidnight] {
        &self.millis
    }

    /// All bid sizes.
    #[inline]
    pub fn bid_sizes_slice(&self) -> &[i32] {
        &self.bid_sizes
    }

    /// All bid prices.
    #[inline]
    pub fn bid_prices_slice(&self) -> &[f32] {
        &self.bid_prices
    }

    /// All ask sizes.
    #[inline]
    pub fn ask_sizes_slice(&self) -> &[i32] {
        &self.ask_sizes
    }

    /// All ask prices.
    #[inline]
    pub fn ask_prices_slice(&self) -> &[f32] {
        &self.ask_prices
    }

    /// Mid prices, the sequence the outlier filter tests for quotes.
    pub fn test_prices(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.mid(i)).collect()
    }

    /// New series retaining only the records at `keep` indices (ascending).
    ///
    /// Size and price arrays use the identical retained-index set; timestamps
    /// are carried over verbatim.
    pub fn retain_indices(&self, keep: &[usize]) -> Self {
        Self {
            day_epoch_secs: self.day_epoch_secs,
            millis: keep.iter().map(|&i| self.millis[i]).collect(),
            bid_sizes: keep.iter().map(|&i| self.bid_sizes[i]).collect(),
            bid_prices: keep.iter().map(|&i| self.bid_prices[i]).collect(),
            ask_sizes: keep.iter().map(|&i| self.ask_sizes[i]).collect(),
            ask_prices: keep.iter().map(|&i| self.ask_prices[i]).collect(),
        }
    }
}

/// A decoded tick file of either kind.
///
/// Tagged variant rather than a runtime type string, so adding a third tick
/// type is a compile-time-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickSeries {
    Trade(TradeSeries),
    Quote(QuoteSeries),
}

impl TickSeries {
    /// Record kind of this series.
    #[inline]
    pub fn kind(&self) -> TickKind {
        match self {
            TickSeries::Trade(_) => TickKind::Trade,
            TickSeries::Quote(_) => TickKind::Quote,
        }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TickSeries::Trade(s) => s.len(),
            TickSeries::Quote(s) => s.len(),
        }
    }

    /// True if the series holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seconds from epoch to midnight of the trading day.
    #[inline]
    pub fn day_epoch_secs(&self) -> EpochSecs {
        match self {
            TickSeries::Trade(s) => s.day_epoch_secs(),
            TickSeries::Quote(s) => s.day_epoch_secs(),
        }
    }

    /// Milliseconds from midnight for record `i`.
    #[inline]
    pub fn millis(&self, i: usize) -> MillisFromMidnight {
        match self {
            TickSeries::Trade(s) => s.millis(i),
            TickSeries::Quote(s) => s.millis(i),
        }
    }

    /// The price sequence the outlier filter tests: trade prices directly,
    /// quote mid prices per tick.
    pub fn test_prices(&self) -> Vec<f64> {
        match self {
            TickSeries::Trade(s) => s.test_prices(),
            TickSeries::Quote(s) => s.test_prices(),
        }
    }

    /// New series of the same kind retaining only records at `keep` indices.
    pub fn retain_indices(&self, keep: &[usize]) -> Self {
        match self {
            TickSeries::Trade(s) => TickSeries::Trade(s.retain_indices(keep)),
            TickSeries::Quote(s) => TickSeries::Quote(s.retain_indices(keep)),
        }
    }
}

/// Corporate-action scale factors for one security on one day.
///
/// Sizes are multiplied by `size_factor` (with integer truncation), prices
/// divided by `price_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    /// Multiplier for sizes.
    pub size_factor: f64,
    /// Divisor for prices.
    pub price_factor: f64,
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self {
            size_factor: 1.0,
            price_factor: 1.0,
        }
    }
}

impl AdjustmentFactors {
    /// True if applying these factors is a no-op.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.size_factor == 1.0 && self.price_factor == 1.0
    }
}
