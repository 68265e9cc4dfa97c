use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

pub const DEFAULT_ENDPOINT: &str =
    "https://api.hackerearth.com/v4/partner/code-evaluation/submissions/";

/// 评测服务配置，对应 `hackide.toml` 中的 `[judge]` 表。
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct JudgeConfig {
    /// 提交地址，同时也是状态查询地址的前缀，需以 `/` 结尾。
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,
    #[serde(default = "default_memory_limit_kb")]
    pub memory_limit_kb: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 评测服务不可用时，是否使用内置的模式匹配兜底。
    #[serde(default = "default_fallback_enabled")]
    pub fallback_enabled: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_secret: String::new(),
            time_limit_secs: default_time_limit_secs(),
            memory_limit_kb: default_memory_limit_kb(),
            request_timeout_secs: default_request_timeout_secs(),
            status_timeout_secs: default_status_timeout_secs(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            fallback_enabled: default_fallback_enabled(),
        }
    }
}

impl JudgeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read judge config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse judge config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize judge config")
    }

    /// 状态查询地址：`{endpoint}{he_id}/`。
    pub fn status_url(&self, he_id: &str) -> String {
        format!("{}{}/", self.endpoint, he_id)
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_time_limit_secs() -> u32 {
    5
}

fn default_memory_limit_kb() -> u32 {
    262_144
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_status_timeout_secs() -> u64 {
    10
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_fallback_enabled() -> bool {
    true
}
