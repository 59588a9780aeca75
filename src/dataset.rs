//! Metric Dataset
//!
//! 分析対象となるメトリクス時系列データの入力モデル。

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// メトリクスの観測点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// 観測時刻
    pub timestamp: DateTime<Utc>,
    /// 観測値
    pub value: f64,
}

impl MetricPoint {
    /// 新しい観測点を作成
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// 名前付きメトリクス時系列
///
/// 不変条件: タイムスタンプは狭義単調増加、値はすべて有限。
/// 構築後は読み取り専用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSeries {
    name: String,
    points: Vec<MetricPoint>,
}

impl MetricSeries {
    /// 新しい時系列を作成（不変条件を検証）
    pub fn new(name: impl Into<String>, points: Vec<MetricPoint>) -> Result<Self> {
        let name = name.into();

        for window in points.windows(2) {
            if window[1].timestamp <= window[0].timestamp {
                return Err(Error::InvalidSeries(format!(
                    "{}: timestamps must be strictly increasing",
                    name
                )));
            }
        }

        if let Some(point) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(Error::InvalidSeries(format!(
                "{}: non-finite value at {}",
                name, point.timestamp
            )));
        }

        Ok(Self { name, points })
    }

    /// (時刻, 値) ペアから時系列を作成
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
    ) -> Result<Self> {
        let points = pairs
            .into_iter()
            .map(|(timestamp, value)| MetricPoint::new(timestamp, value))
            .collect();
        Self::new(name, points)
    }

    /// メトリクス名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 観測点を取得
    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    /// 値のベクトルを取得
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// タイムスタンプのベクトルを取得
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// 観測点数を取得
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// メトリクス名で索引された時系列コレクション
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricDataset {
    series: HashMap<String, MetricSeries>,
}

impl MetricDataset {
    /// 空のデータセットを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 時系列のコレクションからデータセットを作成
    pub fn from_series(series: impl IntoIterator<Item = MetricSeries>) -> Self {
        let mut dataset = Self::new();
        for s in series {
            dataset.insert(s);
        }
        dataset
    }

    /// 時系列を登録（同名の既存系列は置き換え）
    pub fn insert(&mut self, series: MetricSeries) {
        self.series.insert(series.name().to_string(), series);
    }

    /// 時系列を取得
    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.series.get(name)
    }

    /// 登録済みメトリクス名を取得（名前順）
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }

    /// 登録済み系列数を取得
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 2系列を共通タイムスタンプで内部結合
    ///
    /// 各ペアの有効な重なりはペアごとに異なるため、結合はペア単位で行う。
    pub fn aligned_pair(&self, a: &str, b: &str) -> Option<AlignedPair> {
        let series_a = self.series.get(a)?;
        let series_b = self.series.get(b)?;

        let mut timestamps = Vec::new();
        let mut values_a = Vec::new();
        let mut values_b = Vec::new();

        // 両系列ともタイムスタンプ昇順なのでマージ走査で結合できる
        let (pa, pb) = (series_a.points(), series_b.points());
        let (mut i, mut j) = (0, 0);
        while i < pa.len() && j < pb.len() {
            match pa[i].timestamp.cmp(&pb[j].timestamp) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    timestamps.push(pa[i].timestamp);
                    values_a.push(pa[i].value);
                    values_b.push(pb[j].value);
                    i += 1;
                    j += 1;
                }
            }
        }

        Some(AlignedPair {
            timestamps,
            values_a,
            values_b,
        })
    }
}

/// 共通タイムスタンプに揃えた2系列の値
#[derive(Debug, Clone)]
pub struct AlignedPair {
    /// 共通タイムスタンプ
    pub timestamps: Vec<DateTime<Utc>>,
    /// 1系列目の値
    pub values_a: Vec<f64>,
    /// 2系列目の値
    pub values_b: Vec<f64>,
}

impl AlignedPair {
    /// 重なりの長さを取得
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
