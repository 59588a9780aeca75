//! Descriptive Statistics
//!
//! 平均・分散・分位点などの記述統計量

/// 平均値を計算
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 母分散を計算
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// 母標準偏差を計算
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// 分位点を計算（線形補間）
///
/// `p` は 0..=100 のパーセント値。
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (n - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// モーメントベースの歪度 g1 = m3 / m2^(3/2)
pub fn skewness(values: &[f64]) -> f64 {
    let m = mean(values);
    let n = values.len() as f64;
    if n < 1.0 {
        return 0.0;
    }

    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / n;

    if m2 <= f64::EPSILON {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// モーメントベースの尖度 b2 = m4 / m2^2（正規分布で 3.0）
pub fn kurtosis(values: &[f64]) -> f64 {
    let m = mean(values);
    let n = values.len() as f64;
    if n < 1.0 {
        return 0.0;
    }

    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>() / n;

    if m2 <= f64::EPSILON {
        return 0.0;
    }
    m4 / (m2 * m2)
}
