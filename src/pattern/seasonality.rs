//! Seasonality Detection
//!
//! 候補周期のブロック相関スキャンによる季節性検出
//!
//! 系列を `周期 × ブロック数` に再構成し、周期内位置どうしの
//! ブロック横断相関の平均絶対値をスコアとする。

use crate::stats::{pearson, population_variance};

/// 季節性検出に必要な最小観測点数
const MIN_SAMPLES: usize = 24;
/// 季節性ありと判定するスコアしきい値
const SCORE_THRESHOLD: f64 = 0.3;

/// 季節性を検出。`(検出フラグ, 周期)` を返す
///
/// 候補は先頭から試し、スコアが厳密に上回った候補だけが勝者を更新する。
pub fn detect_seasonality(values: &[f64], candidates: &[usize]) -> (bool, Option<usize>) {
    if values.len() < MIN_SAMPLES {
        return (false, None);
    }

    let mut best_period = None;
    let mut best_score = 0.0;

    for &period in candidates {
        if period == 0 || values.len() < 2 * period {
            continue;
        }
        let score = seasonal_score(values, period);
        if score > best_score {
            best_score = score;
            best_period = Some(period);
        }
    }

    (best_score > SCORE_THRESHOLD, best_period)
}

/// 指定周期の季節性スコアを計算
fn seasonal_score(values: &[f64], period: usize) -> f64 {
    let n_periods = values.len() / period;
    if n_periods < 2 {
        return 0.0;
    }

    // 周期内位置 i のブロック横断ベクトル
    let column = |i: usize| -> Vec<f64> {
        (0..n_periods).map(|b| values[b * period + i]).collect()
    };

    let mut correlations = Vec::new();
    for i in 0..period {
        let col_i = column(i);
        if population_variance(&col_i) <= 0.0 {
            continue;
        }
        for j in (i + 1)..period {
            let col_j = column(j);
            if population_variance(&col_j) <= 0.0 {
                continue;
            }
            let (r, _) = pearson(&col_i, &col_j);
            correlations.push(r.abs());
        }
    }

    if correlations.is_empty() {
        return 0.0;
    }
    correlations.iter().sum::<f64>() / correlations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_sinusoid_with_trend_detected_at_12() {
        // 12周期の正弦成分 + 緩やかなトレンド、36点
        let values: Vec<f64> = (0..36)
            .map(|t| 10.0 * (TAU * t as f64 / 12.0).sin() + 0.5 * t as f64)
            .collect();

        let (detected, period) = detect_seasonality(&values, &[12, 4, 6]);
        assert!(detected);
        assert_eq!(period, Some(12));
    }

    #[test]
    fn test_too_short_series() {
        let values: Vec<f64> = (0..20).map(|t| (t % 4) as f64).collect();
        assert_eq!(detect_seasonality(&values, &[12, 4, 6]), (false, None));
    }

    #[test]
    fn test_exactly_periodic_series_has_zero_block_variance() {
        // 完全周期系列はブロック間分散がゼロで相関が定義できない
        let values: Vec<f64> = (0..24).map(|t| (t % 4) as f64).collect();
        let score = seasonal_score(&values, 4);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_candidate_requires_two_full_periods() {
        // 24点では周期12は2ブロックで成立、周期13は不成立
        let values: Vec<f64> = (0..24).map(|t| t as f64 + ((t % 12) as f64)).collect();
        let (_, period) = detect_seasonality(&values, &[13]);
        assert_eq!(period, None);
    }
}
