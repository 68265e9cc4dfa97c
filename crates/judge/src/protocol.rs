use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const HEADER_CLIENT_SECRET: &str = "client-secret";
pub const STATUS_ACCEPTED: &str = "AC";
pub const STATUS_RUNTIME_ERROR: &str = "RE";
pub const STATUS_TIME_LIMIT: &str = "TLE";
pub const STATUS_MEMORY_LIMIT: &str = "MLE";
pub const COMPILE_ERROR: &str = "CE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub lang: String,
    pub source: String,
    pub input: String,
    pub memory_limit: u32,
    pub time_limit: u32,
    /// 随请求回传的上下文，为 JSON 字符串。
    pub context: String,
}

impl EvaluationRequest {
    /// 编译并以 `input` 运行。
    pub fn new(
        lang: impl Into<String>,
        source: impl Into<String>,
        input: impl Into<String>,
        memory_limit: u32,
        time_limit: u32,
    ) -> Self {
        let input = input.into();
        let context = json!({ "request_type": "run", "user_input": input }).to_string();
        Self {
            lang: lang.into(),
            source: source.into(),
            input,
            memory_limit,
            time_limit,
            context,
        }
    }

    /// 只编译，不运行。
    pub fn compile_only(
        lang: impl Into<String>,
        source: impl Into<String>,
        memory_limit: u32,
        time_limit: u32,
    ) -> Self {
        Self {
            lang: lang.into(),
            source: source.into(),
            input: String::new(),
            memory_limit,
            time_limit,
            context: json!({ "request_type": "compile_only" }).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub he_id: Option<String>,
    #[serde(default)]
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub he_id: Option<String>,
    #[serde(default)]
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default)]
    pub compile_status: Option<String>,
    #[serde(default)]
    pub run_status: RunStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatus {
    #[serde(default)]
    pub status: Option<String>,
    /// 输出内容，通常是一个需要再次下载的 URL。
    #[serde(default)]
    pub output: Option<String>,
    /// 秒，可能是字符串或数字。
    #[serde(default)]
    pub time_used: Option<Value>,
    /// 字节，可能是字符串或数字。
    #[serde(default)]
    pub memory_used: Option<Value>,
    #[serde(default)]
    pub stderr: Option<String>,
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl RunStatus {
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// 执行时间换算为毫秒，无法解析时为 0。
    pub fn execution_ms(&self) -> u32 {
        self.time_used
            .as_ref()
            .and_then(as_f64)
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| (secs * 1000.0) as u32)
            .unwrap_or(0)
    }

    /// 内存超过 1024 时按字节换算为 KB，否则原样返回。
    pub fn memory_kb(&self) -> u32 {
        let Some(raw) = self
            .memory_used
            .as_ref()
            .and_then(as_f64)
            .filter(|m| m.is_finite() && *m >= 0.0)
        else {
            return 0;
        };
        let raw = raw as u64;
        let kb = if raw > 1024 { raw / 1024 } else { raw };
        u32::try_from(kb).unwrap_or(u32::MAX)
    }
}
