//! Correlation Result Types
//!
//! ペア相関分析の結果型定義

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 検出された関係の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationType {
    /// 線形関係
    Linear,
    /// 非線形（単調または高相互情報量）関係
    NonLinear,
    /// 時間差を伴う関係
    Lagged,
    /// 弱い関係
    Weak,
}

/// 相関係数の 95% 信頼区間
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// 下限
    pub lower: f64,
    /// 上限
    pub upper: f64,
}

impl ConfidenceInterval {
    /// 新しい信頼区間を作成
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// 区間幅を取得
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// メトリクスペア1組の分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// 1つ目のメトリクス名
    pub metric_a: String,
    /// 2つ目のメトリクス名
    pub metric_b: String,
    /// Pearson 相関係数（-1.0 - 1.0）
    pub pearson_correlation: f64,
    /// Spearman 順位相関係数（-1.0 - 1.0）
    pub spearman_correlation: f64,
    /// Kendall 順位一致相関係数（-1.0 - 1.0）
    pub kendall_correlation: f64,
    /// 相互情報量（0 以上、単位 nat）
    pub mutual_information: f64,
    /// 簡易 Granger 因果検定の近似p値（(0,1]、小さいほど先行の証拠が強い）
    pub granger_p_value: f64,
    /// 符号付きラグ → 相関係数（負のラグは2つ目の系列が先行）
    pub lag_correlation: BTreeMap<i32, f64>,
    /// 非線形モデルの平均特徴量重要度（0.0-1.0）
    pub ml_feature_importance: f64,
    /// 非線形モデルの決定係数（0.0-1.0、負は 0 へ切り上げ）
    pub r_squared: f64,
    /// 統計的有意性（相関3検定の最小p値）
    pub statistical_significance: f64,
    /// ビジネス影響スコア（0.0-10.0）
    pub business_impact_score: f64,
    /// 関係の分類
    pub correlation_type: CorrelationType,
    /// Pearson 相関係数の 95% 信頼区間
    pub confidence_interval: ConfidenceInterval,
    /// データ品質スコア（0.0-1.0）
    pub data_quality_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CorrelationResult {
        let mut lag_correlation = BTreeMap::new();
        lag_correlation.insert(1, 0.4);
        lag_correlation.insert(-1, 0.2);

        CorrelationResult {
            metric_a: "Marketing Spend".to_string(),
            metric_b: "Sales Revenue".to_string(),
            pearson_correlation: 0.85,
            spearman_correlation: 0.82,
            kendall_correlation: 0.7,
            mutual_information: 0.9,
            granger_p_value: 0.03,
            lag_correlation,
            ml_feature_importance: 0.2,
            r_squared: 0.75,
            statistical_significance: 0.001,
            business_impact_score: 9.2,
            correlation_type: CorrelationType::Linear,
            confidence_interval: ConfidenceInterval::new(0.7, 0.93),
            data_quality_score: 0.9,
        }
    }

    #[test]
    fn test_serialization_round_trip() {
        let result = sample_result();

        let json = serde_json::to_string(&result).unwrap();
        let parsed: CorrelationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.metric_a, result.metric_a);
        assert_eq!(parsed.correlation_type, CorrelationType::Linear);
        assert_eq!(parsed.lag_correlation, result.lag_correlation);
    }

    #[test]
    fn test_correlation_type_serialization() {
        // 下流の報告レイヤーが期待するケバブケース表現
        assert_eq!(
            serde_json::to_string(&CorrelationType::NonLinear).unwrap(),
            "\"non-linear\""
        );
        assert_eq!(
            serde_json::to_string(&CorrelationType::Weak).unwrap(),
            "\"weak\""
        );
    }

    #[test]
    fn test_confidence_interval_width() {
        let interval = ConfidenceInterval::new(0.2, 0.6);
        assert!((interval.width() - 0.4).abs() < 1e-12);
    }
}
