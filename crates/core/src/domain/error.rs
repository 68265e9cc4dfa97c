use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid score: {0}. score must be in [0, {max}]", max = super::Score::MAX)]
    InvalidScore(u32),
    #[error("Invalid language - not supported: {0}")]
    UnsupportedLanguage(String),
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),
    #[error("invalid submission status: {0}")]
    InvalidSubmissionStatus(String),
    #[error("invalid violation type: {0}")]
    InvalidViolationKind(String),
    #[error("invalid plan: {0}")]
    InvalidPlanTier(String),
    #[error("Username is required.")]
    EmptyUsername,
    #[error("Username must be {max} characters or fewer.", max = super::Username::MAX_LEN)]
    UsernameTooLong(usize),
    #[error("Username can only contain letters, digits and @/./+/-/_ characters.")]
    InvalidUsernameCharacter(char),
}
