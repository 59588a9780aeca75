//! Pairwise Correlation Analysis
//!
//! 複数の統計・ML手法を組み合わせたメトリクスペア相関分析エンジン
//!
//! ## 主要機能
//!
//! - **データ品質ゲート**: 分散・外れ値・正規性の重み付き評価
//! - **相関トライアド**: Pearson / Spearman / Kendall と有意性
//! - **非線形依存**: 相互情報量とアンサンブル回帰による適合度
//! - **先行/遅行分析**: 符号付きラグ相関と簡易 Granger 因果検定
//! - **ビジネス影響スコア**: 統計強度・有意性・ドメイン重要度・品質の合成
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use correlate_rs::correlation::{CorrelationConfig, PairwiseCorrelationAnalyzer};
//! use correlate_rs::dataset::MetricDataset;
//!
//! let analyzer = PairwiseCorrelationAnalyzer::new(CorrelationConfig::default());
//! let dataset = MetricDataset::new();
//! let names = dataset.metric_names();
//!
//! for result in analyzer.analyze(&dataset, &names) {
//!     println!(
//!         "{} <-> {}: impact {:.1}/10",
//!         result.metric_a, result.metric_b, result.business_impact_score
//!     );
//! }
//! ```

mod analyzer;
mod causality;
mod features;
mod lag;
mod quality;
mod types;

use serde::{Deserialize, Serialize};

pub use analyzer::PairwiseCorrelationAnalyzer;
pub use types::{ConfidenceInterval, CorrelationResult, CorrelationType};

/// ペア相関分析の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// ペアごとの最小標本数
    pub min_data_points: usize,
    /// データ品質ゲートのしきい値（0.0-1.0）
    pub quality_threshold: f64,
    /// ラグ相関を走査する最大ラグ
    pub max_lag: usize,
    /// 有意水準
    pub significance_level: f64,
    /// ビジネス影響度を引き上げるメトリクス名キーワード
    pub high_impact_keywords: Vec<String>,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_data_points: 10,
            quality_threshold: 0.5,
            max_lag: 6,
            significance_level: 0.05,
            high_impact_keywords: vec![
                "revenue".to_string(),
                "sales".to_string(),
                "profit".to_string(),
                "customer".to_string(),
                "cost".to_string(),
                "margin".to_string(),
            ],
        }
    }
}
