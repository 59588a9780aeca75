//! Correlation Coefficients
//!
//! 相関係数3種（Pearson / Spearman / Kendall）と有意性、信頼区間の計算
//!
//! 各関数は (係数, 両側p値) を返す。退化入力（分散ゼロ、点数不足）は
//! (0.0, 1.0) へ縮退する。

use super::descriptive::mean;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Pearson 積率相関係数と両側p値を計算
pub fn pearson(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n < 2 {
        return (0.0, 1.0);
    }

    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= f64::EPSILON || syy <= f64::EPSILON {
        return (0.0, 1.0);
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    (r, t_test_p_value(r, n))
}

/// Spearman 順位相関係数と両側p値を計算
///
/// 平均順位に変換した上で Pearson を取り、p値は同じ t 近似を使う。
pub fn spearman(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n < 2 {
        return (0.0, 1.0);
    }

    let rx = average_ranks(&x[..n]);
    let ry = average_ranks(&y[..n]);
    pearson(&rx, &ry)
}

/// Kendall tau-b 順位相関係数と両側p値を計算
///
/// p値は正規近似 z = 3τ√(n(n-1)) / √(2(2n+5)) による。
pub fn kendall(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n < 2 {
        return (0.0, 1.0);
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1;
            }
            if dy == 0.0 {
                ties_y += 1;
            }
            if dx != 0.0 && dy != 0.0 {
                if dx * dy > 0.0 {
                    concordant += 1;
                } else {
                    discordant += 1;
                }
            }
        }
    }

    let n0 = (n * (n - 1) / 2) as i64;
    let denom = ((n0 - ties_x) as f64 * (n0 - ties_y) as f64).sqrt();
    if denom <= f64::EPSILON {
        return (0.0, 1.0);
    }

    let tau = ((concordant - discordant) as f64 / denom).clamp(-1.0, 1.0);

    let nf = n as f64;
    let z = 3.0 * tau * (nf * (nf - 1.0)).sqrt() / (2.0 * (2.0 * nf + 5.0)).sqrt();
    let p = match Normal::new(0.0, 1.0) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(z.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    };

    (tau, p)
}

/// 相関係数の 95% 信頼区間（Fisher z 変換）
///
/// |r| >= 0.99 の準退化ケースは狭い対称区間へ短絡する。
pub fn confidence_interval(r: f64, n: usize) -> (f64, f64) {
    if r.abs() >= 0.99 {
        return (r - 0.01, r + 0.01);
    }
    if n <= 3 {
        return (-1.0, 1.0);
    }

    let z = 0.5 * ((1.0 + r) / (1.0 - r)).ln();
    let se = 1.0 / ((n - 3) as f64).sqrt();
    let margin = 1.96 * se;

    let inverse = |z: f64| {
        let e = (2.0 * z).exp();
        (e - 1.0) / (e + 1.0)
    };

    (inverse(z - margin), inverse(z + margin))
}

/// t分布による相関係数の両側p値（df = n - 2）
fn t_test_p_value(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        // |r| = 1: t → ∞
        return 0.0;
    }

    let t = r.abs() * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// 平均順位（タイは平均順位を割り当て）
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = rank;
        }
        i = j + 1;
    }
    ranks
}
