//! Configuration structures for the TAQ processing workspace.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outlier-filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Rolling window width K (ticks). Must be odd and at least 3.
    pub window: usize,
    /// Additive threshold term as a fraction of the window mean. Guards
    /// against near-zero-variance windows flagging tiny deviations.
    pub gamma_multiplier: f64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            window: 21,
            gamma_multiplier: 0.00005,
        }
    }
}

impl CleanConfig {
    /// Validate the window parameter.
    pub fn validate(&self) -> Result<()> {
        if self.window < 3 || self.window % 2 == 0 {
            return Err(Error::config(format!(
                "window must be odd and >= 3, got {}",
                self.window
            )));
        }
        Ok(())
    }

    /// Half-window width `(K-1)/2`.
    #[inline]
    pub fn half_window(&self) -> usize {
        (self.window - 1) / 2
    }
}

/// Adjustment-law comparison tolerances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustConfig {
    /// Relative tolerance.
    pub rel_tol: f64,
    /// Absolute tolerance.
    pub abs_tol: f64,
}

impl Default for AdjustConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1e-5,
            abs_tol: 1e-8,
        }
    }
}

impl AdjustConfig {
    /// `|a - b| <= abs_tol + rel_tol * |b|`.
    #[inline]
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.abs_tol + self.rel_tol * b.abs()
    }
}

/// Batch-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of parallel workers (0 = auto). Bounds concurrent open files
    /// and decompression buffers.
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

/// Return-resampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Bucket width in seconds.
    pub freq_secs: u32,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self { freq_secs: 300 }
    }
}

impl ResampleConfig {
    /// Annualization factor for a 6.5 hour trading day over 252 days.
    #[inline]
    pub fn periods_per_year(&self) -> f64 {
        (16.0 - 9.5) * 3600.0 / self.freq_secs as f64 * 252.0
    }
}
