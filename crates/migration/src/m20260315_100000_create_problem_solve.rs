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
                    .table(ProblemSolve::Table)
                    .if_not_exists()
                    .col(string_len(ProblemSolve::Id, 36).primary_key())
                    .col(string_len(ProblemSolve::UserId, 36))
                    .col(string_len(ProblemSolve::ContestId, 36))
                    .col(string_len(ProblemSolve::ProblemId, 36))
                    .col(string_len(ProblemSolve::SubmissionId, 36))
                    .col(integer(ProblemSolve::Points).default(0))
                    .col(timestamp(ProblemSolve::SolvedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem_solve-user_id")
                            .from(ProblemSolve::Table, ProblemSolve::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem_solve-contest_id")
                            .from(ProblemSolve::Table, ProblemSolve::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem_solve-problem_id")
                            .from(ProblemSolve::Table, ProblemSolve::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem_solve-submission_id")
                            .from(ProblemSolve::Table, ProblemSolve::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One credited solve per user and problem.
        manager
            .create_index(
                Index::create()
                    .name("idx_problem_solve_user_problem")
                    .table(ProblemSolve::Table)
                    .col(ProblemSolve::UserId)
                    .col(ProblemSolve::ProblemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProblemSolve::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProblemSolve {
    Table,
    Id,
    UserId,
    ContestId,
    ProblemId,
    SubmissionId,
    Points,
    SolvedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Contest {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Problem {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
}
