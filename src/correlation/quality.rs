//! Data Quality Assessment
//!
//! 相関分析に先立つペアデータの品質評価
//!
//! 分散 40% + 外れ値 30% + 正規性 30% の重み付き合成。品質ゲートを
//! 下回るペアは報告対象から黙って除外される。

use crate::stats::{normality_test, percentile, population_variance};

/// ペアの品質スコアを計算（0.0-1.0）
pub fn assess_pair_quality(x: &[f64], y: &[f64]) -> f64 {
    // 定数系列は相関が定義できないため品質 0
    if population_variance(x) <= f64::EPSILON || population_variance(y) <= f64::EPSILON {
        return 0.0;
    }
    let variance_score = 1.0;

    let outlier_score = (outlier_score(x) + outlier_score(y)) / 2.0;

    let normality_score = (normality_score(x) + normality_score(y)) / 2.0;

    variance_score * 0.4 + outlier_score * 0.3 + normality_score * 0.3
}

/// IQR 1.5倍ルールによる外れ値スコア（高いほど良い）
fn outlier_score(values: &[f64]) -> f64 {
    let q1 = percentile(values, 25.0);
    let q3 = percentile(values, 75.0);
    let iqr = q3 - q1;

    if iqr == 0.0 {
        return 0.5;
    }

    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let outliers = values
        .iter()
        .filter(|&&v| v < lower_bound || v > upper_bound)
        .count();
    let outlier_ratio = outliers as f64 / values.len() as f64;

    (1.0 - outlier_ratio * 2.0).max(0.0)
}

/// 正規性スコア: p値を10倍して1.0で飽和。検定不能（9点未満）は中立の 1.0
fn normality_score(values: &[f64]) -> f64 {
    match normality_test(values) {
        Some((_, p)) => (p * 10.0).min(1.0),
        None => 1.0,
    }
}
