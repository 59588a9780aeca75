//! Series Pattern Analysis
//!
//! 単一メトリクス時系列の形状プロファイリング
//!
//! ## 主要機能
//!
//! - **トレンド検出**: 最小二乗回帰による方向と強度
//! - **季節性検出**: 候補周期のブロック相関スキャン
//! - **ボラティリティ**: 期間変化率の標準偏差
//! - **異常・変化点検出**: IQRルールと移動平均比較
//! - **予測方向**: 直近ウィンドウの傾きによる粗い方向シグナル
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use correlate_rs::pattern::{PatternConfig, SeriesPatternAnalyzer};
//! use correlate_rs::dataset::MetricDataset;
//!
//! let analyzer = SeriesPatternAnalyzer::new(PatternConfig::default());
//! let dataset = MetricDataset::new();
//!
//! for pattern in analyzer.analyze(&dataset, &dataset.metric_names()) {
//!     println!("{}: trend {:?}", pattern.metric_name, pattern.trend_direction);
//! }
//! ```

mod analyzer;
mod seasonality;
mod types;

use serde::{Deserialize, Serialize};

pub use analyzer::SeriesPatternAnalyzer;
pub use types::{SeriesPattern, TrendDirection};

/// パターン分析の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// 分析対象とする最小観測点数
    pub min_periods: usize,
    /// 季節性の候補周期（優先順）
    pub seasonal_periods: Vec<usize>,
    /// 異常検知のIQR倍率
    pub anomaly_iqr_multiplier: f64,
    /// 変化点判定の相対変化しきい値
    pub change_point_threshold: f64,
    /// トレンド有意性の水準
    pub trend_significance: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_periods: 12,
            seasonal_periods: vec![12, 4, 6],
            anomaly_iqr_multiplier: 2.0,
            change_point_threshold: 0.3,
            trend_significance: 0.05,
        }
    }
}
