//! Summary statistics over a resampled return series.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

use taq_core::ResampleConfig;

/// Annualized summary of one return series.
///
/// Mean and median scale linearly with periods per year, standard deviation
/// with its square root. Skewness and kurtosis are bias-corrected sample
/// moments (0 when too few points to estimate); kurtosis is excess
/// (normal = 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub count: usize,
    pub mean_annualized: f64,
    pub median_annualized: f64,
    pub std_annualized: f64,
    /// Mean absolute deviation around the mean, unannualized.
    pub mean_abs_deviation: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    /// Maximum peak-to-trough drawdown of the cumulated return path.
    pub max_drawdown: f64,
}

impl ReturnSummary {
    /// Summarize a return series. Returns `None` for fewer than two points
    /// (no spread to measure).
    pub fn from_returns(returns: &[f64], config: &ResampleConfig) -> Option<Self> {
        if returns.len() < 2 {
            return None;
        }
        let ppy = config.periods_per_year();
        let mean = returns.mean();
        let std = returns.std_dev();
        let data = Data::new(returns.to_vec());
        let median = data.median();

        let mad = returns.iter().map(|r| (r - mean).abs()).sum::<f64>() / returns.len() as f64;

        Some(Self {
            count: returns.len(),
            mean_annualized: mean * ppy,
            median_annualized: median * ppy,
            std_annualized: std * ppy.sqrt(),
            mean_abs_deviation: mad,
            skewness: sample_skewness(returns, mean, std),
            excess_kurtosis: sample_excess_kurtosis(returns, mean, std),
            max_drawdown: max_drawdown(returns),
        })
    }
}

/// Bias-corrected sample skewness, `std` being the sample (n-1) standard
/// deviation. Undefined below three points or at zero variance; 0 there.
fn sample_skewness(returns: &[f64], mean: f64, std: f64) -> f64 {
    let n = returns.len() as f64;
    if returns.len() < 3 || std == 0.0 {
        return 0.0;
    }
    let m3: f64 = returns.iter().map(|r| ((r - mean) / std).powi(3)).sum();
    n / ((n - 1.0) * (n - 2.0)) * m3
}

/// Bias-corrected excess sample kurtosis. Undefined below four points or at
/// zero variance; 0 there.
fn sample_excess_kurtosis(returns: &[f64], mean: f64, std: f64) -> f64 {
    let n = returns.len() as f64;
    if returns.len() < 4 || std == 0.0 {
        return 0.0;
    }
    let m4: f64 = returns.iter().map(|r| ((r - mean) / std).powi(4)).sum();
    n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * m4
        - 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0))
}

/// Maximum drawdown of the cumulated value path `prod(1 + r)`, starting
/// from 1.
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut value = 1.0f64;
    let mut peak = 1.0f64;
    let mut worst = 0.0f64;
    for r in returns {
        value *= 1.0 + r;
        if value >= peak {
            peak = value;
        } else {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> ResampleConfig {
        ResampleConfig { freq_secs: 300 }
    }

    #[test]
    fn test_too_few_points() {
        assert!(ReturnSummary::from_returns(&[0.01], &config()).is_none());
        assert!(ReturnSummary::from_returns(&[], &config()).is_none());
    }

    #[test]
    fn test_annualization_scaling() {
        let returns = [0.001, 0.002, 0.003, 0.002];
        let summary = ReturnSummary::from_returns(&returns, &config()).unwrap();
        let ppy = config().periods_per_year();
        assert_relative_eq!(summary.mean_annualized, 0.002 * ppy, max_relative = 1e-9);
        assert_eq!(summary.count, 4);
        assert!(summary.std_annualized > 0.0);
    }

    #[test]
    fn test_max_drawdown_simple_path() {
        // 1 -> 1.1 -> 0.88 -> 0.968: worst drop is 20% off the 1.1 peak.
        let returns = [0.1, -0.2, 0.1];
        assert_relative_eq!(max_drawdown(&returns), 0.2, max_relative = 1e-9);
    }

    #[test]
    fn test_monotonic_path_has_no_drawdown() {
        let returns = [0.01, 0.02, 0.005];
        assert_eq!(max_drawdown(&returns), 0.0);
    }

    #[test]
    fn test_symmetric_returns_have_zero_skew() {
        let returns = [-0.01, 0.01, -0.01, 0.01];
        let summary = ReturnSummary::from_returns(&returns, &config()).unwrap();
        assert_relative_eq!(summary.skewness, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_moment_corrections() {
        // One outlier among zeros: mean 0.25, sample std 0.5, so the
        // corrected estimators come out at exactly 2 and 4.
        let returns = [0.0, 0.0, 0.0, 1.0];
        let summary = ReturnSummary::from_returns(&returns, &config()).unwrap();
        assert_relative_eq!(summary.skewness, 2.0, max_relative = 1e-12);
        assert_relative_eq!(summary.excess_kurtosis, 4.0, max_relative = 1e-12);
        assert_relative_eq!(summary.mean_abs_deviation, 0.375, max_relative = 1e-12);
    }

    #[test]
    fn test_moments_undefined_for_tiny_samples() {
        // Two points define a spread but not a skew; three not a kurtosis.
        let two = ReturnSummary::from_returns(&[0.01, 0.03], &config()).unwrap();
        assert_eq!(two.skewness, 0.0);
        assert_eq!(two.excess_kurtosis, 0.0);
        let three = ReturnSummary::from_returns(&[0.01, 0.03, 0.02], &config()).unwrap();
        assert_eq!(three.excess_kurtosis, 0.0);
    }
}
