use thiserror::Error;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("评测请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No execution ID received from HackerEarth")]
    MissingExecutionId,

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JudgeError>;
