use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    WrongAnswer,
    TimeLimit,
    MemoryLimit,
    RuntimeError,
    CompilationError,
    NoTestCases,
    Error,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 9] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Accepted,
        SubmissionStatus::WrongAnswer,
        SubmissionStatus::TimeLimit,
        SubmissionStatus::MemoryLimit,
        SubmissionStatus::RuntimeError,
        SubmissionStatus::CompilationError,
        SubmissionStatus::NoTestCases,
        SubmissionStatus::Error,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Accepted => "ACCEPTED",
            SubmissionStatus::WrongAnswer => "WRONG_ANSWER",
            SubmissionStatus::TimeLimit => "TIME_LIMIT",
            SubmissionStatus::MemoryLimit => "MEMORY_LIMIT",
            SubmissionStatus::RuntimeError => "RUNTIME_ERROR",
            SubmissionStatus::CompilationError => "COMPILATION_ERROR",
            SubmissionStatus::NoTestCases => "NO_TEST_CASES",
            SubmissionStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| DomainError::InvalidSubmissionStatus(s.to_string()))
    }
}

/// 提交参与计分的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionKind {
    #[default]
    Test,
    Final,
    /// 比赛被终止后的提交，不参与排名。
    Practice,
}

impl SubmissionKind {
    pub fn code(self) -> &'static str {
        match self {
            SubmissionKind::Test => "TEST",
            SubmissionKind::Final => "FINAL",
            SubmissionKind::Practice => "PRACTICE",
        }
    }
}
