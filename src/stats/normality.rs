//! Normality Test
//!
//! D'Agostino の K² 検定による正規性の適合度検定
//!
//! 歪度検定と尖度検定の z 統計量を組み合わせ、自由度2のカイ二乗分布で
//! p値を求める。標本数 9 未満では近似が成立しないため `None` を返す。

use super::descriptive::{kurtosis, population_variance, skewness};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// 正規性検定の最小標本数
pub const MIN_SAMPLES: usize = 9;

/// D'Agostino K² 検定
///
/// `(統計量, p値)` を返す。標本数不足・分散ゼロでは `None`。
pub fn normality_test(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < MIN_SAMPLES {
        return None;
    }
    if population_variance(values) <= f64::EPSILON {
        return None;
    }

    let z_skew = skewness_z(values)?;
    let z_kurt = kurtosis_z(values)?;

    let k2 = z_skew * z_skew + z_kurt * z_kurt;
    let p = match ChiSquared::new(2.0) {
        Ok(dist) => (1.0 - dist.cdf(k2)).clamp(0.0, 1.0),
        Err(_) => return None,
    };

    Some((k2, p))
}

/// 歪度検定の z 統計量（D'Agostino 1970）
fn skewness_z(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let g1 = skewness(values);

    let y = g1 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    if w2 <= 1.0 {
        return None;
    }
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();

    let y = if y == 0.0 { 1.0 } else { y };
    let z = delta * (y / alpha + ((y / alpha).powi(2) + 1.0).sqrt()).ln();
    z.is_finite().then_some(z)
}

/// 尖度検定の z 統計量（Anscombe & Glynn 1983）
fn kurtosis_z(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let b2 = kurtosis(values);

    let e = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0).powi(2) * (n + 3.0) * (n + 5.0));
    if var_b2 <= 0.0 {
        return None;
    }
    let x = (b2 - e) / var_b2.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    if sqrt_beta1 == 0.0 {
        return None;
    }
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / sqrt_beta1.powi(2)).sqrt());

    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return None;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();

    let z = (term1 - term2) / (2.0 / (9.0 * a)).sqrt();
    z.is_finite().then_some(z)
}
