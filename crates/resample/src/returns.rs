//! Fixed-interval return series from a decoded tick series.
//!
//! Buckets are aligned to midnight of the trading day. Each bucket takes its
//! first observation; the return of a bucket is the percent change from the
//! previous bucket's price. Buckets with no ticks carry the last observed
//! price forward, so each contributes an explicit zero-return point.

use serde::{Deserialize, Serialize};

use taq_core::{ResampleConfig, TickSeries};

/// One resampled observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    /// Bucket start in epoch milliseconds.
    pub epoch_millis: i64,
    /// Percent change from the previous bucket's (possibly carried) price.
    pub ret: f64,
}

/// Resampled return series for one (security, day) file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampledReturns {
    /// Bucket width in seconds.
    pub freq_secs: u32,
    /// One return per bucket between the first and last observation,
    /// ascending in time; tickless buckets are zero. The first observed
    /// bucket has no predecessor and produces no point.
    pub points: Vec<ReturnPoint>,
}

impl ResampledReturns {
    /// Just the return values.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ret).collect()
    }
}

/// Resample a series into fixed-frequency returns.
///
/// Prices are trade prices for trade files and quote mids for quote files,
/// matching what the cleaning pipeline tests.
pub fn resample_returns(series: &TickSeries, config: &ResampleConfig) -> ResampledReturns {
    let width_ms = config.freq_secs as i64 * 1000;
    let day_ms = series.day_epoch_secs() as i64 * 1000;
    let prices = series.test_prices();

    // First observation per bucket, bucketing on millis from midnight so
    // boundaries sit on the trading day, not the Unix epoch. Ticks are
    // ordered by time, so the first record seen in a bucket is its first
    // observation.
    let mut firsts: Vec<(i64, f64)> = Vec::new();
    for (i, &price) in prices.iter().enumerate() {
        let offset = series.millis(i) as i64;
        let bucket = day_ms + offset.div_euclid(width_ms) * width_ms;
        match firsts.last() {
            Some(&(last_bucket, _)) if last_bucket == bucket => {}
            _ => firsts.push((bucket, price)),
        }
    }

    let mut points = Vec::new();
    for pair in firsts.windows(2) {
        let (prev_bucket, prev_price) = pair[0];
        let (bucket, price) = pair[1];
        // Tickless buckets in between carry the previous price forward and
        // contribute an explicit zero return.
        let mut carried = prev_bucket + width_ms;
        while carried < bucket {
            points.push(ReturnPoint {
                epoch_millis: carried,
                ret: 0.0,
            });
            carried += width_ms;
        }
        points.push(ReturnPoint {
            epoch_millis: bucket,
            ret: price / prev_price - 1.0,
        });
    }

    ResampledReturns {
        freq_secs: config.freq_secs,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use taq_core::TradeSeries;

    fn series(millis: Vec<u32>, prices: Vec<f32>) -> TickSeries {
        let sizes = vec![100; millis.len()];
        TickSeries::Trade(TradeSeries::new(0, millis, sizes, prices).unwrap())
    }

    #[test]
    fn test_first_observation_per_bucket() {
        // 300s buckets; two ticks land in the first bucket, the second tick
        // is ignored.
        let s = series(
            vec![0, 100_000, 300_000, 600_000],
            vec![10.0, 99.0, 11.0, 12.1],
        );
        let config = ResampleConfig { freq_secs: 300 };
        let resampled = resample_returns(&s, &config);

        assert_eq!(resampled.points.len(), 2);
        assert_eq!(resampled.points[0].epoch_millis, 300_000);
        assert_relative_eq!(resampled.points[0].ret, 0.1, max_relative = 1e-6);
        assert_relative_eq!(resampled.points[1].ret, 0.1, max_relative = 1e-6);
    }

    #[test]
    fn test_empty_bucket_emits_zero_return() {
        // Nothing trades in [300s, 600s); that bucket carries the 0s price
        // forward as a zero return, and the 600s bucket's return is still
        // measured against the 0s price.
        let s = series(vec![0, 600_000], vec![10.0, 15.0]);
        let config = ResampleConfig { freq_secs: 300 };
        let resampled = resample_returns(&s, &config);

        assert_eq!(resampled.points.len(), 2);
        assert_eq!(resampled.points[0].epoch_millis, 300_000);
        assert_eq!(resampled.points[0].ret, 0.0);
        assert_eq!(resampled.points[1].epoch_millis, 600_000);
        assert_relative_eq!(resampled.points[1].ret, 0.5, max_relative = 1e-6);
    }

    #[test]
    fn test_long_gap_emits_one_zero_per_bucket() {
        let s = series(vec![0, 1_200_000], vec![10.0, 11.0]);
        let resampled = resample_returns(&s, &ResampleConfig { freq_secs: 300 });

        assert_eq!(resampled.points.len(), 4);
        assert_eq!(resampled.values()[..3], [0.0, 0.0, 0.0]);
        assert_relative_eq!(resampled.points[3].ret, 0.1, max_relative = 1e-6);
    }

    #[test]
    fn test_single_bucket_yields_no_returns() {
        let s = series(vec![0, 1000, 2000], vec![10.0, 11.0, 12.0]);
        let resampled = resample_returns(&s, &ResampleConfig { freq_secs: 300 });
        assert!(resampled.points.is_empty());
    }

    #[test]
    fn test_buckets_aligned_to_day_epoch() {
        let s = TickSeries::Trade(
            TradeSeries::new(
                1_182_312_000,
                vec![34_200_000, 34_500_000],
                vec![1, 1],
                vec![100.0, 101.0],
            )
            .unwrap(),
        );
        let resampled = resample_returns(&s, &ResampleConfig { freq_secs: 300 });
        assert_eq!(resampled.points.len(), 1);
        // 1_182_312_000s + 34_500s is itself a 300s boundary.
        assert_eq!(
            resampled.points[0].epoch_millis,
            (1_182_312_000i64 + 34_500) * 1000
        );
    }

    #[test]
    fn test_buckets_aligned_to_midnight_not_unix_epoch() {
        // Day start of 100s is not a 300s multiple; boundaries must still
        // fall on midnight + k * 300s.
        let s = TickSeries::Trade(
            TradeSeries::new(100, vec![0, 300_000], vec![1, 1], vec![100.0, 101.0]).unwrap(),
        );
        let resampled = resample_returns(&s, &ResampleConfig { freq_secs: 300 });
        assert_eq!(resampled.points.len(), 1);
        assert_eq!(resampled.points[0].epoch_millis, 100_000 + 300_000);
    }
}
