use super::{
    CodeRunner, Language, RunRequest, RunnerError, Score, SubmissionStatus, TestCase,
    normalize_output,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    pub status: SubmissionStatus,
    pub score: Score,
    pub message: String,
    pub passed: usize,
    pub total: usize,
    pub execution_ms: u32,
    pub memory_kb: u32,
    /// 第一个失败用例的序号，从 1 开始。
    pub failed_test: Option<usize>,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl GradeReport {
    fn new(status: SubmissionStatus, message: impl Into<String>, total: usize) -> Self {
        Self {
            status,
            score: Score::default(),
            message: message.into(),
            passed: 0,
            total,
            execution_ms: 0,
            memory_kb: 0,
            failed_test: None,
            expected: None,
            actual: None,
        }
    }
}

fn status_for(err: &RunnerError) -> SubmissionStatus {
    match err {
        RunnerError::Compilation => SubmissionStatus::CompilationError,
        RunnerError::TimeLimit => SubmissionStatus::TimeLimit,
        RunnerError::MemoryLimit => SubmissionStatus::MemoryLimit,
        RunnerError::Runtime(_) | RunnerError::Timeout | RunnerError::Unavailable(_) => {
            SubmissionStatus::RuntimeError
        }
    }
}

/// 按顺序用每个测试用例运行提交，遇到第一个失败即停止。
pub async fn grade(
    runner: &dyn CodeRunner,
    language: Language,
    source_code: &str,
    tests: &[TestCase],
    points: Score,
) -> GradeReport {
    let total = tests.len();
    if tests.is_empty() {
        return GradeReport::new(
            SubmissionStatus::NoTestCases,
            "No test cases available for this problem",
            0,
        );
    }

    let mut report = GradeReport::new(SubmissionStatus::Pending, "", total);

    for (index, test) in tests.iter().enumerate() {
        let request = RunRequest::new(language, source_code, test.input.clone());

        let output = match runner.run(request).await {
            Ok(output) => output,
            Err(err) => {
                report.status = status_for(&err);
                report.message = err.to_string();
                report.failed_test = Some(index + 1);
                return report;
            }
        };

        let expected = test.output.trim();
        let actual = output.output.trim();
        if normalize_output(actual) != normalize_output(expected) {
            report.status = SubmissionStatus::WrongAnswer;
            report.message = format!("Wrong Answer on test case {}", index + 1);
            report.failed_test = Some(index + 1);
            report.expected = Some(expected.to_string());
            report.actual = Some(actual.to_string());
            return report;
        }

        report.passed += 1;
        report.execution_ms = report.execution_ms.max(output.execution_ms);
        report.memory_kb = report.memory_kb.max(output.memory_kb);
    }

    report.status = SubmissionStatus::Accepted;
    report.score = points;
    report.message = format!("Solution Accepted! Passed all {total} test cases");
    report
}
