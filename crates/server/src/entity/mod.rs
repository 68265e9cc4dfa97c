pub mod contest;
pub mod participant;
pub mod problem;
pub mod problem_solve;
pub mod proctoring_session;
pub mod proctoring_violation;
pub mod submission;
pub mod subscription;
pub mod subscription_plan;
pub mod user;
