//! Series Pattern Analyzer
//!
//! 単一メトリクス時系列のパターン分析器の実装

use super::seasonality::detect_seasonality;
use super::types::{SeriesPattern, TrendDirection};
use super::PatternConfig;
use crate::dataset::MetricDataset;
use crate::stats::{pearson, percentile, population_std_dev};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// 異常検知に必要な最小観測点数
const MIN_ANOMALY_SAMPLES: usize = 10;
/// 変化点検出に必要な最小観測点数
const MIN_CHANGE_POINT_SAMPLES: usize = 6;

/// 時系列パターン分析器
#[derive(Debug, Clone)]
pub struct SeriesPatternAnalyzer {
    /// 設定
    config: PatternConfig,
}

impl SeriesPatternAnalyzer {
    /// 新しい分析器を作成
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// 設定を取得
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// 各メトリクスのパターンを分析
    ///
    /// 最小長ゲート（`min_periods`）未満の系列は黙って除外する。
    pub fn analyze(&self, dataset: &MetricDataset, metric_names: &[String]) -> Vec<SeriesPattern> {
        metric_names
            .iter()
            .filter_map(|name| self.analyze_metric(dataset, name))
            .collect()
    }

    /// 各メトリクスをワーカープールへ分散して分析（出力は `analyze` と同一）
    pub async fn analyze_parallel(
        &self,
        dataset: &MetricDataset,
        metric_names: &[String],
    ) -> Vec<SeriesPattern> {
        let mut jobs = Vec::new();
        for (index, name) in metric_names.iter().enumerate() {
            if let Some(series) = dataset.get(name) {
                if series.len() >= self.config.min_periods {
                    jobs.push((index, name.clone(), series.timestamps(), series.values()));
                } else {
                    debug!("skipping series {}: {} points", name, series.len());
                }
            }
        }

        let concurrency = num_cpus::get().max(1);
        let config = self.config.clone();

        let mut indexed: Vec<(usize, SeriesPattern)> = stream::iter(jobs)
            .map(|(index, name, timestamps, values)| {
                let config = config.clone();
                tokio::task::spawn_blocking(move || {
                    (index, analyze_series(&config, name, &timestamps, &values))
                })
            })
            .buffer_unordered(concurrency)
            .filter_map(|joined| async move {
                match joined {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warn!("pattern worker failed: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        // 入力メトリクス順を復元
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, pattern)| pattern).collect()
    }

    /// 1メトリクスを分析。長さゲート未満なら None
    fn analyze_metric(&self, dataset: &MetricDataset, name: &str) -> Option<SeriesPattern> {
        let series = dataset.get(name)?;
        if series.len() < self.config.min_periods {
            debug!("skipping series {}: {} points", name, series.len());
            return None;
        }

        Some(analyze_series(
            &self.config,
            name.to_string(),
            &series.timestamps(),
            &series.values(),
        ))
    }
}

impl Default for SeriesPatternAnalyzer {
    fn default() -> Self {
        Self::new(PatternConfig::default())
    }
}

/// 長さゲート通過後の系列にフルパイプラインを適用
fn analyze_series(
    config: &PatternConfig,
    metric_name: String,
    timestamps: &[DateTime<Utc>],
    values: &[f64],
) -> SeriesPattern {
    let (trend_direction, trend_strength) = analyze_trend(values, config.trend_significance);
    let (seasonality_detected, seasonal_period) =
        detect_seasonality(values, &config.seasonal_periods);
    let volatility_score = volatility(values);
    let anomaly_periods = detect_anomalies(timestamps, values, config.anomaly_iqr_multiplier);
    let change_points = detect_change_points(timestamps, values, config.change_point_threshold);
    let forecast_direction = forecast_direction(values);

    // データ量 40% + トレンド強度 40% + 低ボラティリティ 20%
    let confidence_level = (values.len() as f64 / 24.0).min(1.0) * 0.4
        + trend_strength * 0.4
        + (1.0 - volatility_score).max(0.0) * 0.2;

    debug!(
        "series {}: trend {:?} ({:.2}), seasonal {:?}, volatility {:.2}",
        metric_name, trend_direction, trend_strength, seasonal_period, volatility_score
    );

    SeriesPattern {
        metric_name,
        trend_direction,
        trend_strength,
        seasonality_detected,
        seasonal_period,
        volatility_score,
        anomaly_periods,
        change_points,
        forecast_direction,
        confidence_level,
    }
}

/// トレンドの方向と強度（標本インデックスに対する回帰）
fn analyze_trend(values: &[f64], significance: f64) -> (TrendDirection, f64) {
    let indices: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let (r, p) = pearson(&indices, values);
    let strength = r.abs();

    if p > significance || r == 0.0 {
        return (TrendDirection::Stable, strength);
    }
    if r > 0.0 {
        (TrendDirection::Increasing, strength)
    } else {
        (TrendDirection::Decreasing, strength)
    }
}

/// 期間変化率の標準偏差をスケールしたボラティリティ（0.0-1.0）
fn volatility(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    // 分母ゼロの期間はスキップ
    let returns: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0].abs() > f64::EPSILON)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    (population_std_dev(&returns) * 10.0).min(1.0)
}

/// 広めのIQRルール（既定 2.0倍）による強い外れ値の検出
fn detect_anomalies(
    timestamps: &[DateTime<Utc>],
    values: &[f64],
    multiplier: f64,
) -> Vec<DateTime<Utc>> {
    if values.len() < MIN_ANOMALY_SAMPLES {
        return Vec::new();
    }

    let q1 = percentile(values, 25.0);
    let q3 = percentile(values, 75.0);
    let iqr = q3 - q1;

    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    values
        .iter()
        .zip(timestamps.iter())
        .filter(|(&v, _)| v < lower_bound || v > upper_bound)
        .map(|(_, &t)| t)
        .collect()
}

/// 移動平均の前後比較による変化点検出
fn detect_change_points(
    timestamps: &[DateTime<Utc>],
    values: &[f64],
    threshold: f64,
) -> Vec<DateTime<Utc>> {
    let n = values.len();
    if n < MIN_CHANGE_POINT_SAMPLES {
        return Vec::new();
    }

    let window = (n / 6).max(3);
    let mut change_points = Vec::new();

    for i in window..n.saturating_sub(window) {
        let before: f64 = values[i - window..i].iter().sum::<f64>() / window as f64;
        let after: f64 = values[i..i + window].iter().sum::<f64>() / window as f64;

        if before.abs() > f64::EPSILON && ((after - before) / before).abs() > threshold {
            change_points.push(timestamps[i]);
        }
    }

    change_points
}

/// 直近ウィンドウ（末尾 1/4、最低3点）の傾きによる予測方向
fn forecast_direction(values: &[f64]) -> TrendDirection {
    if values.len() < 3 {
        return TrendDirection::Stable;
    }

    let recent_size = (values.len() / 4).max(3);
    let recent = &values[values.len() - recent_size..];

    let indices: Vec<f64> = (0..recent.len()).map(|i| i as f64).collect();
    let (r, p) = pearson(&indices, recent);

    if p > 0.1 || r.abs() < 0.3 {
        return TrendDirection::Stable;
    }
    if r > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}
