//! Pattern Analysis Types
//!
//! パターン分析の結果型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// トレンド方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// 上昇トレンド
    Increasing,
    /// 下降トレンド
    Decreasing,
    /// 安定
    Stable,
}

/// 単一メトリクス時系列の分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPattern {
    /// メトリクス名
    pub metric_name: String,
    /// トレンド方向
    pub trend_direction: TrendDirection,
    /// トレンド強度（0.0-1.0）
    pub trend_strength: f64,
    /// 季節性の有無
    pub seasonality_detected: bool,
    /// 検出された周期（標本数単位）
    pub seasonal_period: Option<usize>,
    /// ボラティリティスコア（0.0-1.0）
    pub volatility_score: f64,
    /// 異常と判定された時刻
    pub anomaly_periods: Vec<DateTime<Utc>>,
    /// 変化点の時刻
    pub change_points: Vec<DateTime<Utc>>,
    /// 直近ウィンドウから導いた予測方向
    pub forecast_direction: TrendDirection,
    /// 分析全体の信頼度（0.0-1.0）
    pub confidence_level: f64,
}
