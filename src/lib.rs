//! # correlate-rs
//!
//! Multi-method correlation and time-series pattern analysis engine for
//! business metrics.
//!
//! Two independent analyzers consume the same immutable dataset of named,
//! time-indexed numeric series: [`PairwiseCorrelationAnalyzer`] ranks metric
//! pairs by a business-impact score derived from several complementary
//! correlation and causality signals, and [`SeriesPatternAnalyzer`] profiles
//! each series' shape over time (trend, seasonality, volatility, anomalies,
//! change points). Both are pure functions of their inputs and safe to run
//! in parallel.

pub mod config;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod pattern;
pub mod stats;

pub use config::EngineConfig;
pub use correlation::{
    ConfidenceInterval, CorrelationConfig, CorrelationResult, CorrelationType,
    PairwiseCorrelationAnalyzer,
};
pub use dataset::{MetricDataset, MetricPoint, MetricSeries};
pub use error::{Error, Result};
pub use pattern::{PatternConfig, SeriesPattern, SeriesPatternAnalyzer, TrendDirection};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::InvalidSeries("test".to_string());
        assert!(err.to_string().contains("test"));
    }
}
