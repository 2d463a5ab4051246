//! 应用配置模块
//!
//! 配置只读，不会写回磁盘。

use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "MIRRORVAULT_CONFIG";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// 轮询间隔（秒）
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// 未输入目标目录时使用的路径
    #[serde(default = "default_destination")]
    pub default_destination: String,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_destination() -> String {
    crate::core::DEFAULT_DESTINATION.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            default_destination: default_destination(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载，失败时使用默认值
    pub fn load(config_file: &Path) -> Self {
        match Self::try_load(config_file) {
            Ok(config) => config,
            Err(e) => {
                // 此时日志系统尚未初始化
                eprintln!("读取配置失败，使用默认配置: {:#}", e);
                Self::default()
            }
        }
    }

    /// 从 JSON 文件加载
    pub fn try_load(config_file: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(config_file)?;
        let config = serde_json::from_str::<AppConfig>(&content)?;
        Ok(config)
    }

    /// 读取 `MIRRORVAULT_CONFIG` 指定的文件，未设置时使用默认值
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Self::default(),
        }
    }

    /// 轮询间隔，至少 1 秒
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.default_destination, "./backup");
        assert_eq!(config.log.file, "file_manager.log");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "pollIntervalSecs": 2, "log": { "level": "debug" } }"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.default_destination, "./backup");
        assert_eq!(config.log.level, "debug");
        assert!(config.log.enabled);
    }

    #[test]
    fn test_malformed_or_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::try_load(&path).is_err());
        assert_eq!(AppConfig::load(&path).poll_interval_secs, 5);
        assert_eq!(
            AppConfig::load(&dir.path().join("missing.json")).poll_interval_secs,
            5
        );
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = AppConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
