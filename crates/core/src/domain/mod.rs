mod boilerplate;
mod camera;
mod catalog;
mod code_runner;
mod contest;
mod difficulty;
mod error;
mod grading;
mod ids;
mod language;
mod leaderboard;
mod output;
mod proctoring;
mod score;
mod submission_status;
mod subscription;
mod test_case;
mod username;

pub use boilerplate::{
    FunctionSignature, SignatureParam, boilerplate_for, boilerplate_map, default_boilerplate,
    generate_stub, parse_boilerplate,
};
pub use camera::{
    CameraFlags, EntryDecision, GateInput, ProblemAccess, SkipReason, evaluate_contest_entry,
    evaluate_problem_access,
};
pub use catalog::{CatalogEntry, CatalogSort, PremiumFilter, company_tags};
pub use code_runner::{CodeRunner, RunOutput, RunRequest, RunnerError};
pub use contest::{ContestWindow, Prizes};
pub use difficulty::Difficulty;
pub use error::DomainError;
pub use grading::{GradeReport, grade};
pub use ids::{ContestId, PlanId, ProblemId, SubmissionId, UserId};
pub use language::Language;
pub use leaderboard::{LeaderboardRow, Standing, rank_participants};
pub use output::normalize_output;
pub use proctoring::{
    MAX_WARNINGS, ProctoringState, TERMINATION_THRESHOLD, ViolationKind, ViolationOutcome,
};
pub use score::Score;
pub use submission_status::{SubmissionKind, SubmissionStatus};
pub use subscription::{PlanTier, SubscriptionWindow, has_premium_access};
pub use test_case::{TestCase, parse_test_cases};
pub use username::Username;
