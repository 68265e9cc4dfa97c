use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::Username, 150).unique_key())
                    .col(boolean(User::IsStaff).default(false))
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contest::Table)
                    .if_not_exists()
                    .col(string_len(Contest::Id, 36).primary_key())
                    .col(string_len(Contest::Title, 200))
                    .col(text(Contest::Description))
                    .col(timestamp(Contest::StartTime))
                    .col(timestamp(Contest::EndTime))
                    .col(boolean(Contest::IsActive).default(true))
                    // Prize money in whole rupees.
                    .col(big_integer(Contest::FirstPrize).default(0))
                    .col(big_integer(Contest::SecondPrize).default(0))
                    .col(big_integer(Contest::ThirdPrize).default(0))
                    .col(boolean(Contest::RequiresProctoring).default(true))
                    .col(timestamp(Contest::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Problem::Table)
                    .if_not_exists()
                    .col(string_len(Problem::Id, 36).primary_key())
                    // NULL for standalone (premium) problems.
                    .col(string_len_null(Problem::ContestId, 36))
                    .col(string_len(Problem::Title, 200))
                    .col(text(Problem::Description))
                    // 0=easy, 1=medium, 2=hard
                    .col(
                        small_integer(Problem::Difficulty)
                            .check(Expr::col(Problem::Difficulty).gte(0))
                            .check(Expr::col(Problem::Difficulty).lte(2)),
                    )
                    .col(integer(Problem::TimeLimitMs).default(1000))
                    .col(integer(Problem::MemoryLimitMb).default(256))
                    // JSON list of {"input", "output"}.
                    .col(text(Problem::TestCases))
                    .col(integer(Problem::Points).default(100))
                    .col(boolean(Problem::IsPremium).default(false))
                    // JSON map of language code to starter code.
                    .col(text(Problem::Boilerplate))
                    .col(string_len(Problem::CompanyTag, 100).default(""))
                    .col(boolean(Problem::SignatureEnabled).default(false))
                    .col(string_len(Problem::SignatureName, 100).default(""))
                    // JSON list of {"name", "type"}.
                    .col(text(Problem::SignatureParams))
                    .col(string_len(Problem::SignatureReturn, 50).default(""))
                    .col(timestamp(Problem::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem-contest_id")
                            .from(Problem::Table, Problem::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::UserId, 36))
                    .col(string_len(Submission::ProblemId, 36))
                    // Position in the language list, 0=c ... 15=scala.
                    .col(
                        small_integer(Submission::Language)
                            .check(Expr::col(Submission::Language).gte(0))
                            .check(Expr::col(Submission::Language).lte(15)),
                    )
                    .col(text(Submission::SourceCode))
                    // 0=pending, 1=accepted, 2=wrong_answer, 3=time_limit,
                    // 4=memory_limit, 5=runtime_error, 6=compilation_error,
                    // 7=no_test_cases, 8=error
                    .col(
                        small_integer(Submission::Status)
                            .check(Expr::col(Submission::Status).gte(0))
                            .check(Expr::col(Submission::Status).lte(8)),
                    )
                    .col(
                        integer(Submission::Score)
                            .default(0)
                            .check(Expr::col(Submission::Score).gte(0)),
                    )
                    .col(integer_null(Submission::ExecutionTimeMs))
                    .col(integer_null(Submission::MemoryKb))
                    .col(boolean(Submission::IsFinal).default(false))
                    // 0=test, 1=final, 2=practice
                    .col(
                        small_integer(Submission::Kind)
                            .default(0)
                            .check(Expr::col(Submission::Kind).gte(0))
                            .check(Expr::col(Submission::Kind).lte(2)),
                    )
                    .col(boolean(Submission::IsPractice).default(false))
                    .col(timestamp(Submission::SubmittedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-user_id")
                            .from(Submission::Table, Submission::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-problem_id")
                            .from(Submission::Table, Submission::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participant::Table)
                    .if_not_exists()
                    .col(string_len(Participant::Id, 36).primary_key())
                    .col(string_len(Participant::UserId, 36))
                    .col(string_len(Participant::ContestId, 36))
                    .col(timestamp(Participant::JoinedAt).default(Expr::current_timestamp()))
                    .col(integer(Participant::TotalScore).default(0))
                    .col(integer(Participant::ProblemsSolved).default(0))
                    .col(boolean(Participant::HasFinalSubmitted).default(false))
                    .col(timestamp_null(Participant::FinalSubmittedAt))
                    .col(integer(Participant::FinalSubmissionScore).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participant-user_id")
                            .from(Participant::Table, Participant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participant-contest_id")
                            .from(Participant::Table, Participant::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProctoringSession::Table)
                    .if_not_exists()
                    .col(string_len(ProctoringSession::Id, 36).primary_key())
                    .col(string_len(ProctoringSession::UserId, 36))
                    .col(string_len(ProctoringSession::ContestId, 36))
                    .col(boolean(ProctoringSession::FaceDetected).default(false))
                    .col(integer(ProctoringSession::FacesCount).default(0))
                    .col(text(ProctoringSession::Details))
                    .col(boolean(ProctoringSession::IsMonitoringActive).default(false))
                    .col(integer(ProctoringSession::ViolationCount).default(0))
                    .col(integer(ProctoringSession::WarningCount).default(0))
                    .col(boolean(ProctoringSession::ContestTerminated).default(false))
                    .col(boolean(ProctoringSession::PracticeMode).default(false))
                    .col(timestamp_null(ProctoringSession::LastFaceCheck))
                    .col(timestamp_null(ProctoringSession::MonitoringStartedAt))
                    .col(
                        timestamp(ProctoringSession::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-proctoring_session-user_id")
                            .from(ProctoringSession::Table, ProctoringSession::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-proctoring_session-contest_id")
                            .from(ProctoringSession::Table, ProctoringSession::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProctoringViolation::Table)
                    .if_not_exists()
                    .col(string_len(ProctoringViolation::Id, 36).primary_key())
                    .col(string_len(ProctoringViolation::SessionId, 36))
                    // 0=face_not_detected, 1=multiple_faces, 2=camera_blocked,
                    // 3=no_camera_access
                    .col(
                        small_integer(ProctoringViolation::Kind)
                            .check(Expr::col(ProctoringViolation::Kind).gte(0))
                            .check(Expr::col(ProctoringViolation::Kind).lte(3)),
                    )
                    .col(text(ProctoringViolation::Details))
                    .col(boolean(ProctoringViolation::WarningGiven).default(false))
                    .col(
                        timestamp(ProctoringViolation::OccurredAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-proctoring_violation-session_id")
                            .from(ProctoringViolation::Table, ProctoringViolation::SessionId)
                            .to(ProctoringSession::Table, ProctoringSession::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlan::Table)
                    .if_not_exists()
                    .col(string_len(SubscriptionPlan::Id, 36).primary_key())
                    // 0=free, 1=pro, 2=premium
                    .col(
                        small_integer(SubscriptionPlan::Tier)
                            .unique_key()
                            .check(Expr::col(SubscriptionPlan::Tier).gte(0))
                            .check(Expr::col(SubscriptionPlan::Tier).lte(2)),
                    )
                    .col(string_len(SubscriptionPlan::DisplayName, 100))
                    .col(text(SubscriptionPlan::Description))
                    .col(big_integer(SubscriptionPlan::PriceInr).default(0))
                    .col(integer(SubscriptionPlan::DurationDays).default(30))
                    .col(boolean(SubscriptionPlan::IsActive).default(true))
                    .col(
                        timestamp(SubscriptionPlan::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(string_len(Subscription::Id, 36).primary_key())
                    .col(string_len(Subscription::UserId, 36))
                    .col(string_len(Subscription::PlanId, 36))
                    .col(timestamp(Subscription::StartDate))
                    .col(timestamp(Subscription::EndDate))
                    .col(boolean(Subscription::IsActive).default(true))
                    .col(boolean(Subscription::AutoRenew).default(false))
                    .col(timestamp(Subscription::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscription-user_id")
                            .from(Subscription::Table, Subscription::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscription-plan_id")
                            .from(Subscription::Table, Subscription::PlanId)
                            .to(SubscriptionPlan::Table, SubscriptionPlan::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_problem_contest_id")
                    .table(Problem::Table)
                    .col(Problem::ContestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_user_problem")
                    .table(Submission::Table)
                    .col(Submission::UserId)
                    .col(Submission::ProblemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_submitted_at")
                    .table(Submission::Table)
                    .col(Submission::SubmittedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participant_user_contest")
                    .table(Participant::Table)
                    .col(Participant::UserId)
                    .col(Participant::ContestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_proctoring_session_user_contest")
                    .table(ProctoringSession::Table)
                    .col(ProctoringSession::UserId)
                    .col(ProctoringSession::ContestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_proctoring_violation_session_id")
                    .table(ProctoringViolation::Table)
                    .col(ProctoringViolation::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_user_active_end")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::IsActive)
                    .col(Subscription::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SubscriptionPlan::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProctoringViolation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProctoringSession::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Participant::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Problem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Contest::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    IsStaff,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contest {
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    IsActive,
    FirstPrize,
    SecondPrize,
    ThirdPrize,
    RequiresProctoring,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Problem {
    Table,
    Id,
    ContestId,
    Title,
    Description,
    Difficulty,
    TimeLimitMs,
    MemoryLimitMb,
    TestCases,
    Points,
    IsPremium,
    Boilerplate,
    CompanyTag,
    SignatureEnabled,
    SignatureName,
    SignatureParams,
    SignatureReturn,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    UserId,
    ProblemId,
    Language,
    SourceCode,
    Status,
    Score,
    ExecutionTimeMs,
    MemoryKb,
    IsFinal,
    Kind,
    IsPractice,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Participant {
    Table,
    Id,
    UserId,
    ContestId,
    JoinedAt,
    TotalScore,
    ProblemsSolved,
    HasFinalSubmitted,
    FinalSubmittedAt,
    FinalSubmissionScore,
}

#[derive(DeriveIden)]
enum ProctoringSession {
    Table,
    Id,
    UserId,
    ContestId,
    FaceDetected,
    FacesCount,
    Details,
    IsMonitoringActive,
    ViolationCount,
    WarningCount,
    ContestTerminated,
    PracticeMode,
    LastFaceCheck,
    MonitoringStartedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProctoringViolation {
    Table,
    Id,
    SessionId,
    Kind,
    Details,
    WarningGiven,
    OccurredAt,
}

#[derive(DeriveIden)]
enum SubscriptionPlan {
    Table,
    Id,
    Tier,
    DisplayName,
    Description,
    PriceInr,
    DurationDays,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    UserId,
    PlanId,
    StartDate,
    EndDate,
    IsActive,
    AutoRenew,
    CreatedAt,
}
