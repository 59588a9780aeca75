//! Pairwise Correlation Analyzer
//!
//! メトリクスペア相関分析器の実装
//!
//! 全ペアに9段階のパイプラインを適用し、ビジネス影響スコア降順の
//! ランキングを返す。標本数・品質ゲートを通らないペアは黙って除外する
//! （疎・退化ペアは想定内の状態であり、エラーではない）。

use super::causality::granger_causality;
use super::features::nonlinear_fit;
use super::lag::{scan_lag_correlations, strongest_lag_correlation};
use super::quality::assess_pair_quality;
use super::types::{ConfidenceInterval, CorrelationResult, CorrelationType};
use super::CorrelationConfig;
use crate::dataset::MetricDataset;
use crate::stats::{confidence_interval, kendall, mutual_information, pearson, spearman};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// メトリクスペア相関分析器
#[derive(Debug, Clone)]
pub struct PairwiseCorrelationAnalyzer {
    /// 設定
    config: CorrelationConfig,
}

impl PairwiseCorrelationAnalyzer {
    /// 新しい分析器を作成
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// 設定を取得
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// 全メトリクスペアを分析し、ビジネス影響スコア降順で返す
    ///
    /// データセットに存在しない名前は読み飛ばす。
    pub fn analyze(&self, dataset: &MetricDataset, metric_names: &[String]) -> Vec<CorrelationResult> {
        let mut results = Vec::new();

        for (i, name_a) in metric_names.iter().enumerate() {
            for name_b in &metric_names[i + 1..] {
                if let Some(result) = self.analyze_pair(dataset, name_a, name_b) {
                    results.push(result);
                }
            }
        }

        sort_by_impact(&mut results);
        results
    }

    /// 全ペアをワーカープールへ分散して分析（出力は `analyze` と同一）
    pub async fn analyze_parallel(
        &self,
        dataset: &MetricDataset,
        metric_names: &[String],
    ) -> Vec<CorrelationResult> {
        let mut jobs = Vec::new();
        for (i, name_a) in metric_names.iter().enumerate() {
            for name_b in &metric_names[i + 1..] {
                if let Some(pair) = dataset.aligned_pair(name_a, name_b) {
                    if pair.len() >= self.config.min_data_points {
                        jobs.push((name_a.clone(), name_b.clone(), pair.values_a, pair.values_b));
                    } else {
                        debug!(
                            "skipping pair {} <-> {}: {} aligned points",
                            name_a,
                            name_b,
                            pair.len()
                        );
                    }
                }
            }
        }

        // 並列度はCPUコア数に基づく
        let concurrency = num_cpus::get().max(1);
        let config = self.config.clone();

        let mut results: Vec<CorrelationResult> = stream::iter(jobs)
            .map(|(name_a, name_b, values_a, values_b)| {
                let config = config.clone();
                tokio::task::spawn_blocking(move || {
                    analyze_aligned_pair(&config, name_a, name_b, &values_a, &values_b)
                })
            })
            .buffer_unordered(concurrency)
            .filter_map(|joined| async move {
                match joined {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("correlation worker failed: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        sort_by_impact(&mut results);
        results
    }

    /// 1ペアを分析。ゲートを通らなければ None
    fn analyze_pair(
        &self,
        dataset: &MetricDataset,
        name_a: &str,
        name_b: &str,
    ) -> Option<CorrelationResult> {
        let pair = dataset.aligned_pair(name_a, name_b)?;
        if pair.len() < self.config.min_data_points {
            debug!(
                "skipping pair {} <-> {}: {} aligned points",
                name_a,
                name_b,
                pair.len()
            );
            return None;
        }

        analyze_aligned_pair(
            &self.config,
            name_a.to_string(),
            name_b.to_string(),
            &pair.values_a,
            &pair.values_b,
        )
    }
}

impl Default for PairwiseCorrelationAnalyzer {
    fn default() -> Self {
        Self::new(CorrelationConfig::default())
    }
}

/// 揃え済みペアにフルパイプラインを適用
fn analyze_aligned_pair(
    config: &CorrelationConfig,
    metric_a: String,
    metric_b: String,
    x: &[f64],
    y: &[f64],
) -> Option<CorrelationResult> {
    let n = x.len();
    if n < config.min_data_points {
        return None;
    }

    // 品質ゲート
    let quality = assess_pair_quality(x, y);
    if quality < config.quality_threshold {
        debug!(
            "skipping pair {} <-> {}: quality {:.2} below threshold",
            metric_a, metric_b, quality
        );
        return None;
    }

    // 相関トライアド
    let (pearson_r, pearson_p) = pearson(x, y);
    let (spearman_r, spearman_p) = spearman(x, y);
    let (kendall_r, kendall_p) = kendall(x, y);

    // 非線形依存と先行/遅行
    let mutual_info = mutual_information(x, y);
    let granger_p = granger_causality(x, y);
    let lag_correlation = scan_lag_correlations(x, y, config.max_lag);
    let (ml_importance, r_squared) = nonlinear_fit(x, y);

    let strongest = pearson_r.abs().max(spearman_r.abs()).max(kendall_r.abs());
    let significance = pearson_p.min(spearman_p).min(kendall_p);

    let correlation_type = classify(pearson_r, spearman_r, &lag_correlation, mutual_info);
    let (ci_lower, ci_upper) = confidence_interval(pearson_r, n);
    let impact = business_impact(config, &metric_a, &metric_b, strongest, significance, quality);

    debug!(
        "pair {} <-> {}: pearson {:.3}, type {:?}, impact {:.1}",
        metric_a, metric_b, pearson_r, correlation_type, impact
    );

    Some(CorrelationResult {
        metric_a,
        metric_b,
        pearson_correlation: pearson_r,
        spearman_correlation: spearman_r,
        kendall_correlation: kendall_r,
        mutual_information: mutual_info,
        granger_p_value: granger_p,
        lag_correlation,
        ml_feature_importance: ml_importance,
        r_squared,
        statistical_significance: significance,
        business_impact_score: impact,
        correlation_type,
        confidence_interval: ConfidenceInterval::new(ci_lower, ci_upper),
        data_quality_score: quality,
    })
}

/// 関係を分類（先にマッチした条件が勝つ）
fn classify(
    pearson_r: f64,
    spearman_r: f64,
    lag_correlation: &BTreeMap<i32, f64>,
    mutual_info: f64,
) -> CorrelationType {
    let max_lag_corr = strongest_lag_correlation(lag_correlation);

    if max_lag_corr > pearson_r.abs() + 0.1 {
        return CorrelationType::Lagged;
    }
    if spearman_r.abs() > pearson_r.abs() + 0.2 {
        return CorrelationType::NonLinear;
    }
    if mutual_info > 0.3 && pearson_r.abs() < 0.3 {
        return CorrelationType::NonLinear;
    }
    if pearson_r.abs() > 0.3 {
        return CorrelationType::Linear;
    }
    CorrelationType::Weak
}

/// ビジネス影響スコアを計算（0.0-10.0）
fn business_impact(
    config: &CorrelationConfig,
    metric_a: &str,
    metric_b: &str,
    strongest_correlation: f64,
    significance: f64,
    quality: f64,
) -> f64 {
    let base_score = strongest_correlation.abs() * 10.0;

    let significance_multiplier = if significance < 0.01 {
        1.3
    } else if significance < config.significance_level {
        1.1
    } else {
        0.8
    };

    let a_lower = metric_a.to_lowercase();
    let b_lower = metric_b.to_lowercase();
    let domain_multiplier = if config
        .high_impact_keywords
        .iter()
        .any(|k| a_lower.contains(&k.to_lowercase()) || b_lower.contains(&k.to_lowercase()))
    {
        1.4
    } else {
        1.0
    };

    let quality_multiplier = 0.5 + 0.5 * quality;

    (base_score * significance_multiplier * domain_multiplier * quality_multiplier).min(10.0)
}

/// 影響スコア降順、同点はメトリクス名で安定に並べる
fn sort_by_impact(results: &mut [CorrelationResult]) {
    results.sort_by(|a, b| {
        b.business_impact_score
            .total_cmp(&a.business_impact_score)
            .then_with(|| a.metric_a.cmp(&b.metric_a))
            .then_with(|| a.metric_b.cmp(&b.metric_b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MetricSeries;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn make_series(name: &str, values: &[f64]) -> MetricSeries {
        MetricSeries::from_pairs(
            name,
            values.iter().enumerate().map(|(i, &v)| (ts(i as i64), v)),
        )
        .unwrap()
    }

    fn linear_pair_dataset(n: usize) -> MetricDataset {
        let base: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 + ((i as f64) * 0.9).sin()).collect();
        let derived: Vec<f64> = base.iter().map(|v| 2.0 * v + 5.0).collect();
        MetricDataset::from_series(vec![
            make_series("base", &base),
            make_series("derived", &derived),
        ])
    }

    #[test]
    fn test_perfect_linear_pair() {
        let dataset = linear_pair_dataset(24);
        let analyzer = PairwiseCorrelationAnalyzer::default();

        let results = analyzer.analyze(&dataset, &dataset.metric_names());
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert!((result.pearson_correlation - 1.0).abs() < 1e-9);
        assert_eq!(result.correlation_type, CorrelationType::Linear);
        // 準退化ケースの短絡区間
        assert!((result.confidence_interval.width() - 0.02).abs() < 1e-9);
        assert!(result.statistical_significance < 0.01);
    }

    #[test]
    fn test_minimum_sample_gate() {
        let analyzer = PairwiseCorrelationAnalyzer::default();

        // 9点は報告されない
        let short = linear_pair_dataset(9);
        assert!(analyzer.analyze(&short, &short.metric_names()).is_empty());

        // 10点は報告される
        let enough = linear_pair_dataset(10);
        assert_eq!(enough.metric_names().len(), 2);
        assert_eq!(analyzer.analyze(&enough, &enough.metric_names()).len(), 1);
    }

    #[test]
    fn test_quality_gate_filters_constant_series() {
        let constant = make_series("flat", &[5.0; 20]);
        let ramp = make_series("ramp", &(0..20).map(|i| i as f64).collect::<Vec<_>>());
        let dataset = MetricDataset::from_series(vec![constant, ramp]);

        let analyzer = PairwiseCorrelationAnalyzer::default();
        assert!(analyzer.analyze(&dataset, &dataset.metric_names()).is_empty());
    }

    #[test]
    fn test_unknown_metric_names_skipped() {
        let dataset = linear_pair_dataset(20);
        let analyzer = PairwiseCorrelationAnalyzer::default();

        let names = vec![
            "base".to_string(),
            "derived".to_string(),
            "missing".to_string(),
        ];
        let results = analyzer.analyze(&dataset, &names);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_result_ranges() {
        let dataset = linear_pair_dataset(30);
        let analyzer = PairwiseCorrelationAnalyzer::default();

        for result in analyzer.analyze(&dataset, &dataset.metric_names()) {
            assert!((-1.0..=1.0).contains(&result.pearson_correlation));
            assert!((-1.0..=1.0).contains(&result.spearman_correlation));
            assert!((-1.0..=1.0).contains(&result.kendall_correlation));
            assert!(result.mutual_information >= 0.0);
            assert!(result.granger_p_value > 0.0 && result.granger_p_value <= 1.0);
            assert!((0.0..=1.0).contains(&result.ml_feature_importance));
            assert!((0.0..=1.0).contains(&result.r_squared));
            assert!((0.0..=10.0).contains(&result.business_impact_score));
            assert!((0.0..=1.0).contains(&result.data_quality_score));
        }
    }

    #[test]
    fn test_business_keyword_boost() {
        let config = CorrelationConfig::default();
        let plain = business_impact(&config, "alpha", "beta", 0.5, 0.5, 1.0);
        let boosted = business_impact(&config, "Sales Revenue", "beta", 0.5, 0.5, 1.0);
        assert!((boosted / plain - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_impact_score_capped() {
        let config = CorrelationConfig::default();
        let score = business_impact(&config, "revenue", "profit", 1.0, 0.001, 1.0);
        assert_eq!(score, 10.0);
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let dataset = linear_pair_dataset(24);
        let analyzer = PairwiseCorrelationAnalyzer::default();
        let names = dataset.metric_names();

        let sequential = analyzer.analyze(&dataset, &names);
        let parallel = analyzer.analyze_parallel(&dataset, &names).await;

        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(s.metric_a, p.metric_a);
            assert_eq!(s.pearson_correlation, p.pearson_correlation);
            assert_eq!(s.business_impact_score, p.business_impact_score);
        }
    }
}
