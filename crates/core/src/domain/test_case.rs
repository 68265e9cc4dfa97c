use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

/// 解析题目上保存的 JSON 测试用例列表，格式错误时视为没有用例。
pub fn parse_test_cases(raw: &str) -> Vec<TestCase> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}
