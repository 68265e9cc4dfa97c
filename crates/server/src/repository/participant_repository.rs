use super::submission_repository::SeaOrmSubmissionRepository;
use crate::entity::{participant, problem_solve};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hackide_core::domain::{ContestId, ProblemId, SubmissionId, UserId};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    pub user_id: UserId,
    pub contest_id: ContestId,
    pub joined_at: DateTime<Utc>,
    pub total_score: u32,
    pub problems_solved: u32,
    pub has_final_submitted: bool,
    pub final_submitted_at: Option<DateTime<Utc>>,
    pub final_submission_score: u32,
}

#[derive(Debug, Clone)]
pub struct NewSolve {
    pub user_id: UserId,
    pub contest_id: ContestId,
    pub problem_id: ProblemId,
    pub submission_id: SubmissionId,
    pub points: u32,
}

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn find(&self, user_id: UserId, contest_id: ContestId)
    -> Result<Option<ParticipantRecord>>;
    /// 首次访问时登记参赛者；返回记录以及是否为新建。
    async fn get_or_create(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<(ParticipantRecord, bool)>;
    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ParticipantRecord>>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ParticipantRecord>>;
    /// 记录一道题的首次通过并累加分数；该题已计过分时返回 `false`。
    async fn record_first_solve(&self, solve: NewSolve) -> Result<bool>;
    /// 锁定最终提交；参赛者不存在或已经提交过时返回 `None`。
    async fn record_final_submission(
        &self,
        user_id: UserId,
        contest_id: ContestId,
        score: u32,
        submitted_at: DateTime<Utc>,
        final_submissions: &[SubmissionId],
    ) -> Result<Option<ParticipantRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmParticipantRepository {
    db: DatabaseConnection,
}

impl SeaOrmParticipantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn non_negative(column: &str, value: i32) -> Result<u32> {
        u32::try_from(value).map_err(|_| {
            anyhow!("invalid participant.{column} from database: {value} (must be non-negative)")
        })
    }

    fn map_model(model: participant::Model) -> Result<ParticipantRecord> {
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid participant.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let contest_id = ContestId::from_str(&model.contest_id).map_err(|e| {
            anyhow!(
                "invalid participant.contest_id '{}' from database: {e}",
                model.contest_id
            )
        })?;

        Ok(ParticipantRecord {
            user_id,
            contest_id,
            joined_at: model.joined_at.and_utc(),
            total_score: Self::non_negative("total_score", model.total_score)?,
            problems_solved: Self::non_negative("problems_solved", model.problems_solved)?,
            has_final_submitted: model.has_final_submitted,
            final_submitted_at: model.final_submitted_at.map(|at| at.and_utc()),
            final_submission_score: Self::non_negative(
                "final_submission_score",
                model.final_submission_score,
            )?,
        })
    }

    async fn find_model<C: ConnectionTrait>(
        conn: &C,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<Option<participant::Model>> {
        let model = participant::Entity::find()
            .filter(participant::Column::UserId.eq(user_id.to_string()))
            .filter(participant::Column::ContestId.eq(contest_id.to_string()))
            .one(conn)
            .await?;

        Ok(model)
    }

    /// 插入空白参赛记录，已存在时不做任何事；返回是否插入。
    async fn insert_if_missing<C: ConnectionTrait>(
        conn: &C,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<bool> {
        let active_model = participant::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            contest_id: Set(contest_id.to_string()),
            joined_at: Set(Utc::now().naive_utc()),
            total_score: Set(0),
            problems_solved: Set(0),
            has_final_submitted: Set(false),
            final_submitted_at: Set(None),
            final_submission_score: Set(0),
        };

        let inserted = participant::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([participant::Column::UserId, participant::Column::ContestId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Ok(inserted > 0)
    }
}

#[async_trait]
impl ParticipantRepository for SeaOrmParticipantRepository {
    async fn find(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<Option<ParticipantRecord>> {
        Self::find_model(&self.db, user_id, contest_id)
            .await?
            .map(Self::map_model)
            .transpose()
    }

    async fn get_or_create(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<(ParticipantRecord, bool)> {
        if let Some(model) = Self::find_model(&self.db, user_id, contest_id).await? {
            return Ok((Self::map_model(model)?, false));
        }

        let created = Self::insert_if_missing(&self.db, user_id, contest_id).await?;
        let model = Self::find_model(&self.db, user_id, contest_id)
            .await?
            .ok_or_else(|| {
                anyhow!("participant {user_id} of contest {contest_id} missing after insert")
            })?;

        Ok((Self::map_model(model)?, created))
    }

    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ParticipantRecord>> {
        let models = participant::Entity::find()
            .filter(participant::Column::ContestId.eq(contest_id.to_string()))
            .order_by_asc(participant::Column::JoinedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ParticipantRecord>> {
        let models = participant::Entity::find()
            .filter(participant::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(participant::Column::JoinedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn record_first_solve(&self, solve: NewSolve) -> Result<bool> {
        let points = i32::try_from(solve.points)?;
        let txn = self.db.begin().await?;

        let inserted = problem_solve::Entity::insert(problem_solve::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(solve.user_id.to_string()),
            contest_id: Set(solve.contest_id.to_string()),
            problem_id: Set(solve.problem_id.to_string()),
            submission_id: Set(solve.submission_id.to_string()),
            points: Set(points),
            solved_at: Set(Utc::now().naive_utc()),
        })
        .on_conflict(
            OnConflict::columns([problem_solve::Column::UserId, problem_solve::Column::ProblemId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        if inserted == 0 {
            return Ok(false);
        }

        Self::insert_if_missing(&txn, solve.user_id, solve.contest_id).await?;
        participant::Entity::update_many()
            .col_expr(
                participant::Column::TotalScore,
                Expr::col(participant::Column::TotalScore).add(points),
            )
            .col_expr(
                participant::Column::ProblemsSolved,
                Expr::col(participant::Column::ProblemsSolved).add(1),
            )
            .filter(participant::Column::UserId.eq(solve.user_id.to_string()))
            .filter(participant::Column::ContestId.eq(solve.contest_id.to_string()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    async fn record_final_submission(
        &self,
        user_id: UserId,
        contest_id: ContestId,
        score: u32,
        submitted_at: DateTime<Utc>,
        final_submissions: &[SubmissionId],
    ) -> Result<Option<ParticipantRecord>> {
        let txn = self.db.begin().await?;

        let result = participant::Entity::update_many()
            .col_expr(participant::Column::HasFinalSubmitted, Expr::value(true))
            .col_expr(
                participant::Column::FinalSubmittedAt,
                Expr::value(submitted_at.naive_utc()),
            )
            .col_expr(
                participant::Column::FinalSubmissionScore,
                Expr::value(i32::try_from(score)?),
            )
            .filter(participant::Column::UserId.eq(user_id.to_string()))
            .filter(participant::Column::ContestId.eq(contest_id.to_string()))
            .filter(participant::Column::HasFinalSubmitted.eq(false))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        for submission_id in final_submissions {
            SeaOrmSubmissionRepository::lock_final(&txn, *submission_id).await?;
        }

        let model = Self::find_model(&txn, user_id, contest_id).await?;
        txn.commit().await?;

        model.map(Self::map_model).transpose()
    }
}
