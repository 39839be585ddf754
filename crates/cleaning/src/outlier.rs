//! Rolling-window outlier detection over a price sequence.
//!
//! A tick is flagged when its price deviates from the local window mean by
//! more than `1.5 * std + gamma_multiplier * mean`, with population
//! statistics computed over a K-wide neighborhood that includes the tested
//! point itself.

use statrs::statistics::Statistics;
use taq_core::{CleanConfig, Result};

/// Windowed relative-threshold outlier detector.
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    config: CleanConfig,
}

impl OutlierDetector {
    /// Create a detector, validating the window parameter.
    pub fn new(config: CleanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Window `[left, right)` used for index `i` in a sequence of length `n`.
    ///
    /// Three branches: a fixed leading window for the first `half_window`
    /// indices, a fixed trailing window for the last two indices (`n - i <
    /// 3`), and a centered window otherwise. The trailing branch kicks in
    /// later than the leading one does, so centered windows shorter than K
    /// occur just before the tail; that discontinuity is intentional and
    /// must not be "fixed" (downstream numerical parity depends on it).
    /// Bounds are clamped to `[0, n)` so short sequences never index out of
    /// range.
    pub fn window_bounds(&self, i: usize, n: usize) -> (usize, usize) {
        let k = self.config.window;
        let half_window = self.config.half_window();
        if i < half_window {
            (0, k.min(n))
        } else if n.saturating_sub(i) < 3 {
            (n.saturating_sub(k), n)
        } else {
            (i - half_window, (i + half_window + 1).min(n))
        }
    }

    /// Scan the price sequence and return flagged indices in ascending order.
    ///
    /// An empty sequence is a valid (if degenerate) input and yields no
    /// flags; an empty trading day must clean to an empty file, not an
    /// error.
    pub fn detect(&self, prices: &[f64]) -> Result<Vec<usize>> {
        let n = prices.len();
        let gamma = self.config.gamma_multiplier;
        let mut flagged = Vec::new();
        for i in 0..n {
            let (left, right) = self.window_bounds(i, n);
            let window = &prices[left..right];
            let mean = window.mean();
            let std = window.population_variance().sqrt();
            if (prices[i] - mean).abs() > 1.5 * std + gamma * mean {
                flagged.push(i);
            }
        }
        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(window: usize) -> OutlierDetector {
        OutlierDetector::new(CleanConfig {
            window,
            ..CleanConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_empty_prices_yield_no_flags() {
        assert!(detector(21).detect(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_spike_flagged() {
        let mut prices = vec![1.0; 41];
        prices[20] = 999.0;
        let flagged = detector(21).detect(&prices).unwrap();
        assert_eq!(flagged, vec![20]);
    }

    #[test]
    fn test_constant_series_unflagged() {
        // Zero variance, but the additive gamma term keeps |p - mean| = 0
        // below threshold.
        let prices = vec![25.5; 100];
        assert!(detector(21).detect(&prices).unwrap().is_empty());
    }

    #[test]
    fn test_edge_window_policy() {
        // N=25, K=21: leading indices use [0,21), the last two use [4,25),
        // mid indices are centered.
        let d = detector(21);
        assert_eq!(d.window_bounds(0, 25), (0, 21));
        assert_eq!(d.window_bounds(9, 25), (0, 21));
        assert_eq!(d.window_bounds(12, 25), (2, 23));
        assert_eq!(d.window_bounds(24, 25), (4, 25));
        assert_eq!(d.window_bounds(23, 25), (4, 25));
    }

    #[test]
    fn test_tail_discontinuity_reproduced() {
        // Index 22 of 25 is not in the trailing branch (n - i = 3), so it
        // gets a centered window clamped at the right edge rather than the
        // fixed [4,25) window.
        let d = detector(21);
        assert_eq!(d.window_bounds(22, 25), (12, 25));
    }

    #[test]
    fn test_out_of_range_index_uses_trailing_window() {
        // Past-the-end indices fall into the trailing branch without
        // underflow; callers never see an out-of-range slice.
        let d = detector(21);
        assert_eq!(d.window_bounds(30, 25), (4, 25));
    }

    #[test]
    fn test_spike_in_short_series_clamped_windows() {
        // Shorter than K: windows clamp to the whole series.
        let mut prices = vec![10.0; 9];
        prices[4] = 500.0;
        let flagged = detector(21).detect(&prices).unwrap();
        assert_eq!(flagged, vec![4]);
    }

    #[test]
    fn test_ascending_output() {
        let mut prices = vec![1.0; 60];
        prices[5] = 500.0;
        prices[40] = 700.0;
        let flagged = detector(21).detect(&prices).unwrap();
        assert_eq!(flagged, vec![5, 40]);
    }
}
