//! Lead/Lag Correlation Scan
//!
//! 時間差を伴う相関の走査
//!
//! 正のラグは1つ目の系列が先行、負のラグは2つ目の系列が先行する方向。

use crate::stats::pearson;
use std::collections::BTreeMap;

/// ラグ相関を走査
///
/// lag = 1 .. min(max_lag + 1, n/2) の範囲で、切り詰め後の重なりが
/// 4点以上あるラグのみ計算する。
pub fn scan_lag_correlations(x: &[f64], y: &[f64], max_lag: usize) -> BTreeMap<i32, f64> {
    let n = x.len().min(y.len());
    let mut correlations = BTreeMap::new();

    let upper = (max_lag + 1).min(n / 2);
    for lag in 1..upper {
        if n - lag <= 3 {
            continue;
        }

        // x が lag 期間だけ y に先行
        let (forward, _) = pearson(&x[..n - lag], &y[lag..n]);
        // y が lag 期間だけ x に先行
        let (backward, _) = pearson(&y[..n - lag], &x[lag..n]);

        correlations.insert(lag as i32, forward);
        correlations.insert(-(lag as i32), backward);
    }

    correlations
}

/// ラグ相関の最大絶対値を取得
pub fn strongest_lag_correlation(correlations: &BTreeMap<i32, f64>) -> f64 {
    correlations
        .values()
        .map(|v| v.abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_shifted_series() {
        // y は x を 2 期間遅らせたコピー
        let x: Vec<f64> = (0..30).map(|i| ((i as f64) * 0.8).sin() * 10.0).collect();
        let mut y = vec![0.0, 0.0];
        y.extend_from_slice(&x[..28]);

        let correlations = scan_lag_correlations(&x, &y, 6);
        let at_shift = correlations.get(&2).copied().unwrap();
        assert!(at_shift > 0.99);
        // 同時刻の相関よりラグ2が強い
        let (r0, _) = pearson(&x, &y);
        assert!(at_shift > r0.abs());
    }

    #[test]
    fn test_symmetric_key_mirror() {
        let x: Vec<f64> = (0..20).map(|i| (i as f64).sqrt() * 3.0).collect();
        let y: Vec<f64> = (0..20).map(|i| ((i * i) % 17) as f64).collect();

        let ab = scan_lag_correlations(&x, &y, 6);
        let ba = scan_lag_correlations(&y, &x, 6);

        for (&lag, &r) in &ab {
            assert_eq!(ba.get(&-lag).copied().unwrap(), r);
        }
    }

    #[test]
    fn test_lag_range_bounded_by_half_length() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..10).map(|i| (i as f64) * 2.0).collect();

        let correlations = scan_lag_correlations(&x, &y, 6);
        // n/2 = 5 が上限（排他的）なのでラグは 1..=4
        assert!(correlations.keys().all(|&l| l.unsigned_abs() <= 4));
        assert!(correlations.contains_key(&4));
    }

    #[test]
    fn test_short_series_yields_empty_map() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 4.0, 5.0];
        assert!(scan_lag_correlations(&x, &y, 6).is_empty());
    }

    #[test]
    fn test_strongest_lag_correlation_empty() {
        assert_eq!(strongest_lag_correlation(&BTreeMap::new()), 0.0);
    }
}
