//! Mutual Information
//!
//! 2変数間の相互情報量推定
//!
//! 第一経路はノンパラメトリックな等幅ビニング推定（Miller–Madow バイアス
//! 補正付き）。ビニングが成立しない退化入力ではガウス近似
//! `-0.5 * ln(1 - r²)` へフォールバックする。

use super::correlation::pearson;
use super::descriptive::population_variance;
use tracing::debug;

/// ビニング推定に必要な最小標本数
const MIN_BINNED_SAMPLES: usize = 8;

/// 相互情報量を推定（単位: nat、常に 0 以上）
pub fn mutual_information(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());

    match binned_estimate(&x[..n], &y[..n]) {
        Some(mi) => mi,
        None => {
            debug!("binned MI estimator degenerate, using Gaussian approximation");
            gaussian_approximation(&x[..n], &y[..n])
        }
    }
}

/// 等幅ビニングによるプラグイン推定 + Miller–Madow 補正
fn binned_estimate(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < MIN_BINNED_SAMPLES {
        return None;
    }
    if population_variance(x) <= f64::EPSILON || population_variance(y) <= f64::EPSILON {
        return None;
    }

    let bins = ((n as f64).sqrt().floor() as usize).clamp(2, 10);
    let bx = assign_bins(x, bins)?;
    let by = assign_bins(y, bins)?;

    let mut joint = vec![vec![0usize; bins]; bins];
    let mut marginal_x = vec![0usize; bins];
    let mut marginal_y = vec![0usize; bins];
    for i in 0..n {
        joint[bx[i]][by[i]] += 1;
        marginal_x[bx[i]] += 1;
        marginal_y[by[i]] += 1;
    }

    let nf = n as f64;
    let mut mi = 0.0;
    for (i, row) in joint.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let p_xy = count as f64 / nf;
            let p_x = marginal_x[i] as f64 / nf;
            let p_y = marginal_y[j] as f64 / nf;
            mi += p_xy * (p_xy / (p_x * p_y)).ln();
        }
    }

    // Miller–Madow バイアス補正: 独立データでの過大評価を打ち消す
    let occupied_x = marginal_x.iter().filter(|&&c| c > 0).count();
    let occupied_y = marginal_y.iter().filter(|&&c| c > 0).count();
    let correction = ((occupied_x - 1) * (occupied_y - 1)) as f64 / (2.0 * nf);

    Some((mi - correction).max(0.0))
}

/// ガウス近似によるフォールバック
///
/// 特異点回避のため |r| は 0.99 で打ち切る。
fn gaussian_approximation(x: &[f64], y: &[f64]) -> f64 {
    let (r, _) = pearson(x, y);
    let r = r.abs().min(0.99);
    (-0.5 * (1.0 - r * r).ln()).max(0.0)
}

/// 等幅ビンへの割り当て
fn assign_bins(values: &[f64], bins: usize) -> Option<Vec<usize>> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width <= 0.0 || !width.is_finite() {
        return None;
    }

    Some(
        values
            .iter()
            .map(|&v| (((v - min) / width) as usize).min(bins - 1))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| (v * 0.7).sin()).collect();
        assert!(mutual_information(&x, &y) >= 0.0);
    }

    #[test]
    fn test_strong_dependence_beats_independence() {
        let x: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let dependent: Vec<f64> = x.iter().map(|v| 2.0 * v + 5.0).collect();
        // 決定的だが x と無関係な入れ替わり列
        let shuffled: Vec<f64> = (0..60).map(|i| ((i * 37) % 60) as f64).collect();

        let mi_dep = mutual_information(&x, &dependent);
        let mi_ind = mutual_information(&x, &shuffled);
        assert!(mi_dep > mi_ind);
        assert!(mi_dep > 0.5);
    }

    #[test]
    fn test_gaussian_fallback_on_short_input() {
        // ビニング不成立（点数不足）→ ガウス近似経路
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];

        let mi = mutual_information(&x, &y);
        let expected = -0.5 * (1.0 - 0.99f64 * 0.99).ln();
        assert!((mi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_falls_back_to_zero() {
        let x = vec![5.0; 30];
        let y: Vec<f64> = (0..30).map(|i| i as f64).collect();
        // 分散ゼロ → ビニング不成立 → ガウス近似で r = 0 → MI = 0
        assert_eq!(mutual_information(&x, &y), 0.0);
    }
}
