//! 服务端配置。

use std::path::Path;

use anyhow::{Context, Result};
use hackide_judge::JudgeConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "hackide.toml";

/// 服务端配置，从 `hackide.toml` 读取，环境变量可覆盖。
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// 监听地址。
    #[serde(default = "default_bind")]
    pub bind: String,
    /// 数据库连接串。
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// 评测服务配置。
    #[serde(default)]
    pub judge: JudgeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database_url: default_database_url(),
            judge: JudgeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 从 TOML 文件加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// 从 TOML 字符串解析配置。
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse server config")
    }

    /// 加载配置：文件不存在时使用默认值，然后应用环境变量覆盖。
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// 应用 `DATABASE_URL`、`HE_CLIENT_SECRET`、`HACKIDE_BIND` 覆盖。
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = url;
        }
        if let Some(secret) = lookup("HE_CLIENT_SECRET").filter(|v| !v.is_empty()) {
            self.judge.client_secret = secret;
        }
        if let Some(bind) = lookup("HACKIDE_BIND").filter(|v| !v.is_empty()) {
            self.bind = bind;
        }
        self
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_database_url() -> String {
    "sqlite://hackide.db?mode=rwc".to_string()
}
