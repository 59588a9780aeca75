//! Statistics Module
//!
//! 分析エンジン共通の数値計算ユーティリティ
//!
//! すべての関数は純粋で、退化した入力（分散ゼロ、点数不足）に対しては
//! パニックせず中立値へ縮退する。

pub mod correlation;
pub mod descriptive;
pub mod mutual_info;
pub mod normality;

pub use correlation::{confidence_interval, kendall, pearson, spearman};
pub use descriptive::{mean, percentile, population_std_dev, population_variance};
pub use mutual_info::mutual_information;
pub use normality::normality_test;
