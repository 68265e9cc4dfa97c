//! 评测服务不可用时的模式匹配兜底。
//!
//! 只识别两类示例题：Hello World 与两数之和。

use hackide_core::domain::{RunOutput, RunnerError};

const FALLBACK_EXECUTION_MS: u32 = 100;
const FALLBACK_MEMORY_KB: u32 = 1024;

fn is_hello_world(source: &str) -> bool {
    source.contains("Hello") && source.contains("World")
}

fn is_addition(source: &str) -> bool {
    let lower = source.to_lowercase();
    ["sum", "+", "add", "plus"]
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// 源码是否命中任一已知模式。
pub fn matches_known_pattern(source: &str) -> bool {
    is_hello_world(source) || is_addition(source)
}

fn output(text: String) -> RunOutput {
    RunOutput {
        output: text,
        execution_ms: FALLBACK_EXECUTION_MS,
        memory_kb: FALLBACK_MEMORY_KB,
    }
}

pub fn fallback_run(source: &str, input: &str) -> Result<RunOutput, RunnerError> {
    if is_hello_world(source) {
        let name = input.trim();
        return Ok(if name.is_empty() {
            output("Hello, World!".to_string())
        } else {
            output(format!("Hello, {name}!"))
        });
    }

    if is_addition(source) {
        let lines: Vec<&str> = input.trim().split('\n').collect();
        if lines.len() < 2 {
            return Err(RunnerError::Runtime(
                "Expected two numbers as input".to_string(),
            ));
        }

        let parse = |line: &str| line.trim().parse::<i64>();
        return match (parse(lines[0]), parse(lines[1])) {
            (Ok(a), Ok(b)) => Ok(output(a.saturating_add(b).to_string())),
            _ => Err(RunnerError::Runtime(
                "Invalid input format - expected integers".to_string(),
            )),
        };
    }

    Err(RunnerError::Runtime(
        "Code does not contain expected patterns for known problems".to_string(),
    ))
}
