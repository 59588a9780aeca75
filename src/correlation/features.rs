//! Nonlinear Model Fit
//!
//! 時系列からの特徴量構築とアンサンブル回帰による非線形適合度評価
//!
//! 系列 A から移動平均・差分・ラグコピーの特徴量を組み立て、
//! ランダムフォレストで系列 B を予測する。報告値は平均特徴量重要度と
//! 決定係数（負は 0 へ切り上げ）。乱数は固定シードで決定的。

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

/// フィットに必要な最小行数
const MIN_ROWS: usize = 5;

/// 移動平均ウィンドウ
const MA_WINDOWS: [usize; 2] = [3, 5];
/// ラグコピーのオフセット
const LAG_OFFSETS: [usize; 2] = [1, 2];

/// 非線形フィットの評価結果 (平均特徴量重要度, 決定係数)
pub fn nonlinear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let features = build_features(x);
    let rows = features.len();
    if rows < MIN_ROWS || rows > y.len() {
        return (0.0, 0.0);
    }

    let target: Vec<f64> = y[..rows].to_vec();

    match fit_forest(&features, &target) {
        Some(result) => result,
        None => {
            debug!("nonlinear fit degenerate, reporting no explanatory power");
            (0.0, 0.0)
        }
    }
}

/// 時系列から特徴量行列（行 = 時点）を構築
fn build_features(values: &[f64]) -> Vec<Vec<f64>> {
    let n = values.len();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    // 移動平均（先頭は最初の完全ウィンドウ値で後方充填）
    for &window in &MA_WINDOWS {
        if n >= window {
            columns.push(rolling_mean_backfilled(values, window));
        }
    }

    // 1階差分（先頭は 0）
    if n > 1 {
        let mut diff = Vec::with_capacity(n);
        diff.push(0.0);
        for i in 1..n {
            diff.push(values[i] - values[i - 1]);
        }
        columns.push(diff);
    }

    // ラグコピー（先頭 lag 点は元の先頭値で充填）
    for &lag in &LAG_OFFSETS {
        if n > lag {
            let mut lagged = values[..lag].to_vec();
            lagged.extend_from_slice(&values[..n - lag]);
            columns.push(lagged);
        }
    }

    if columns.is_empty() {
        return values.iter().map(|&v| vec![v]).collect();
    }

    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..rows)
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect()
}

/// 移動平均（未充足位置は最初の完全ウィンドウ値で埋める）
fn rolling_mean_backfilled(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![0.0; n];

    for i in (window - 1)..n {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        out[i] = sum / window as f64;
    }

    let fill = out[window - 1];
    for v in out.iter_mut().take(window - 1) {
        *v = fill;
    }
    out
}

/// ランダムフォレストをフィットし (重要度, R²) を返す。失敗は None
fn fit_forest(features: &Vec<Vec<f64>>, target: &[f64]) -> Option<(f64, f64)> {
    let x = DenseMatrix::from_2d_vec(features);
    let y = target.to_vec();

    // 50本の木、固定シードで決定的
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(50)
        .with_seed(42);
    let model = RandomForestRegressor::fit(&x, &y, params).ok()?;

    let predictions = model.predict(&x).ok()?;
    let base_r2 = r_squared(target, &predictions)?;

    // 特徴量重要度: 列を半周期回転させたときの R² 低下量（決定的な並べ替え）
    let n_features = features[0].len();
    let mut importance_sum = 0.0;
    for j in 0..n_features {
        let rotated = rotate_column(features, j);
        let x_rotated = DenseMatrix::from_2d_vec(&rotated);
        let perm_predictions = model.predict(&x_rotated).ok()?;
        let perm_r2 = r_squared(target, &perm_predictions)?;
        importance_sum += (base_r2 - perm_r2).max(0.0);
    }
    let importance = (importance_sum / n_features as f64).clamp(0.0, 1.0);

    Some((importance, base_r2.max(0.0).min(1.0)))
}

/// 列 j を行数の半分だけ巡回シフトした特徴行列を作成
fn rotate_column(features: &[Vec<f64>], column: usize) -> Vec<Vec<f64>> {
    let rows = features.len();
    let shift = (rows / 2).max(1);

    let mut rotated = features.to_vec();
    for (i, row) in rotated.iter_mut().enumerate() {
        row[column] = features[(i + shift) % rows][column];
    }
    rotated
}

/// 決定係数。目的変数が定数なら None
fn r_squared(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let n = actual.len();
    if n == 0 || n != predicted.len() {
        return None;
    }

    let mean = actual.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = actual.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot <= f64::EPSILON {
        return None;
    }
    let r2 = 1.0 - ss_res / ss_tot;
    r2.is_finite().then_some(r2)
}
