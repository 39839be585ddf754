//! Fixed-frequency return resampling over cleaned tick series.
//!
//! This crate handles:
//! - Bucketing ticks at a caller-chosen frequency (first observation per
//!   bucket, percent change between buckets)
//! - Per-series return summary statistics for data-quality review

pub mod returns;
pub mod summary;

pub use returns::{resample_returns, ResampledReturns, ReturnPoint};
pub use summary::ReturnSummary;
