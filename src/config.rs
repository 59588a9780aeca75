//! Engine Configuration
//!
//! 分析エンジン設定の読み込み
//!
//! デフォルト値 → 設定ファイル → 環境変数の順で上書きする。

use crate::correlation::CorrelationConfig;
use crate::error::{Error, Result};
use crate::pattern::PatternConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 設定ファイルの探索パス
const CONFIG_PATHS: [&str; 2] = ["correlate.toml", "config/correlate.toml"];

/// エンジン全体の設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// ペア相関分析の設定
    pub correlation: CorrelationConfig,
    /// パターン分析の設定
    pub pattern: PatternConfig,
}

impl EngineConfig {
    /// 設定ファイルから読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // デフォルト値を設定
        let defaults = EngineConfig::default();
        settings = settings.add_source(
            config::Config::try_from(&defaults).map_err(|e| Error::Config(e.to_string()))?,
        );

        // 設定ファイルを読み込み（複数の場所を試行）
        for path in &CONFIG_PATHS {
            if std::path::Path::new(path).exists() {
                info!("loading configuration from {}", path);
                settings = settings.add_source(config::File::with_name(path));
                break;
            }
        }

        // 環境変数で上書き (CORRELATE_ で始まる変数)
        settings = settings.add_source(
            config::Environment::with_prefix("CORRELATE")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// サンプル設定ファイルの内容を生成
    pub fn sample_toml() -> Result<String> {
        let sample = EngineConfig::default();
        let body = toml::to_string_pretty(&sample).map_err(|e| Error::Config(e.to_string()))?;

        Ok(format!(
            "# correlate-rs configuration\n#\n\
             # correlate.toml として保存してください。\n\
             # 環境変数での上書きも可能です (例: CORRELATE_CORRELATION__MIN_DATA_POINTS=20)\n\n{}",
            body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_composition() {
        let config = EngineConfig::default();
        assert_eq!(config.correlation.min_data_points, 10);
        assert_eq!(config.pattern.min_periods, 12);
    }

    #[test]
    fn test_sample_toml_round_trip() {
        let sample = EngineConfig::sample_toml().unwrap();
        assert!(sample.contains("[correlation]"));
        assert!(sample.contains("[pattern]"));

        // コメントを除いた本体はそのまま読み戻せる
        let parsed: EngineConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.correlation.max_lag, 6);
        assert_eq!(parsed.pattern.seasonal_periods, vec![12, 4, 6]);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = EngineConfig::load().unwrap();
        assert_eq!(config.correlation.quality_threshold, 0.5);
        assert_eq!(config.pattern.anomaly_iqr_multiplier, 2.0);
    }
}
