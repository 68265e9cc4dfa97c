pub mod contest_repository;
pub mod participant_repository;
pub mod problem_repository;
pub mod proctoring_repository;
pub mod submission_repository;
pub mod subscription_repository;
pub mod user_repository;

pub use contest_repository::{
    ContestRecord, ContestRepository, NewContest, SeaOrmContestRepository,
};
pub use participant_repository::{
    NewSolve, ParticipantRecord, ParticipantRepository, SeaOrmParticipantRepository,
};
pub use problem_repository::{
    NewProblem, ProblemRecord, ProblemRepository, SeaOrmProblemRepository,
};
pub use proctoring_repository::{
    NewViolation, ProctoringRepository, ProctoringSessionRecord, SeaOrmProctoringRepository,
    ViolationRecord,
};
pub use submission_repository::{
    NewSubmission, SeaOrmSubmissionRepository, SubmissionRecord, SubmissionRepository,
    UpdateSubmissionResult,
};
pub use subscription_repository::{
    NewPlan, PlanRecord, SeaOrmSubscriptionRepository, SubscriptionRecord, SubscriptionRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};
