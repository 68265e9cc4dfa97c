use async_trait::async_trait;
use thiserror::Error;

use super::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub language: Language,
    pub source_code: String,
    pub input: String,
    pub time_limit_secs: Option<u32>,
    pub memory_limit_kb: Option<u32>,
}

impl RunRequest {
    pub fn new(language: Language, source_code: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            language,
            source_code: source_code.into(),
            input: input.into(),
            time_limit_secs: None,
            memory_limit_kb: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub output: String,
    pub execution_ms: u32,
    pub memory_kb: u32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Compilation Error")]
    Compilation,
    #[error("Time Limit Exceeded")]
    TimeLimit,
    #[error("Memory Limit Exceeded")]
    MemoryLimit,
    #[error("{0}")]
    Runtime(String),
    #[error("Execution timeout - please try again")]
    Timeout,
    #[error("judge unavailable: {0}")]
    Unavailable(String),
}

/// 用一组输入编译并运行一次程序。
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, request: RunRequest) -> Result<RunOutput, RunnerError>;
}
