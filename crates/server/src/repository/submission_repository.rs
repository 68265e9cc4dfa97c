use crate::entity::submission;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hackide_core::domain::{
    Language, ProblemId, Score, SubmissionId, SubmissionKind, SubmissionStatus, UserId,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub language: Language,
    pub source_code: String,
    pub status: SubmissionStatus,
    pub score: Score,
    pub execution_time_ms: Option<i32>,
    pub memory_kb: Option<i32>,
    pub is_final: bool,
    pub kind: SubmissionKind,
    pub is_practice: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub language: Language,
    pub source_code: String,
    pub is_practice: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateSubmissionResult {
    pub status: SubmissionStatus,
    pub score: Score,
    pub execution_time_ms: Option<i32>,
    pub memory_kb: Option<i32>,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
    async fn update_result(
        &self,
        submission_id: SubmissionId,
        update: UpdateSubmissionResult,
    ) -> Result<Option<SubmissionRecord>>;
    /// 用户对这些题目的提交，最新的在前。
    async fn list_by_user_and_problems(
        &self,
        user_id: UserId,
        problem_ids: &[ProblemId],
    ) -> Result<Vec<SubmissionRecord>>;
    async fn list_by_problems(&self, problem_ids: &[ProblemId]) -> Result<Vec<SubmissionRecord>>;
    async fn mark_as_final(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // 编码为在 `Language::ALL`、`SubmissionStatus::ALL` 中的下标。
    fn map_language(code: i16) -> Result<Language> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Language::ALL.get(index).copied())
            .ok_or_else(|| anyhow!("invalid submission.language code from database: {code}"))
    }

    fn map_language_code(language: Language) -> i16 {
        Language::ALL
            .iter()
            .position(|l| *l == language)
            .and_then(|index| i16::try_from(index).ok())
            .unwrap_or_default()
    }

    fn map_status(code: i16) -> Result<SubmissionStatus> {
        usize::try_from(code)
            .ok()
            .and_then(|index| SubmissionStatus::ALL.get(index).copied())
            .ok_or_else(|| anyhow!("invalid submission.status code from database: {code}"))
    }

    fn map_status_code(status: SubmissionStatus) -> i16 {
        SubmissionStatus::ALL
            .iter()
            .position(|s| *s == status)
            .and_then(|index| i16::try_from(index).ok())
            .unwrap_or_default()
    }

    fn map_kind(code: i16) -> Result<SubmissionKind> {
        match code {
            0 => Ok(SubmissionKind::Test),
            1 => Ok(SubmissionKind::Final),
            2 => Ok(SubmissionKind::Practice),
            _ => Err(anyhow!("invalid submission.kind code from database: {code}")),
        }
    }

    fn map_kind_code(kind: SubmissionKind) -> i16 {
        match kind {
            SubmissionKind::Test => 0,
            SubmissionKind::Final => 1,
            SubmissionKind::Practice => 2,
        }
    }

    fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        let id = SubmissionId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", model.id))?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid submission.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let problem_id = ProblemId::from_str(&model.problem_id).map_err(|e| {
            anyhow!(
                "invalid submission.problem_id '{}' from database: {e}",
                model.problem_id
            )
        })?;
        let score = u32::try_from(model.score).map_err(|_| {
            anyhow!(
                "invalid submission.score from database: {} (must be non-negative)",
                model.score
            )
        })?;

        Ok(SubmissionRecord {
            id,
            user_id,
            problem_id,
            language: Self::map_language(model.language)?,
            source_code: model.source_code,
            status: Self::map_status(model.status)?,
            score: Score::new(score)?,
            execution_time_ms: model.execution_time_ms,
            memory_kb: model.memory_kb,
            is_final: model.is_final,
            kind: Self::map_kind(model.kind)?,
            is_practice: model.is_practice,
            submitted_at: model.submitted_at.and_utc(),
        })
    }

    fn problem_id_strings(problem_ids: &[ProblemId]) -> Vec<String> {
        problem_ids.iter().map(ProblemId::to_string).collect()
    }

    /// 把提交设为最终提交，同一用户同一题目之前的最终提交退回为测试提交。
    pub(crate) async fn lock_final<C: ConnectionTrait>(
        conn: &C,
        submission_id: SubmissionId,
    ) -> Result<Option<submission::Model>> {
        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        submission::Entity::update_many()
            .col_expr(submission::Column::IsFinal, Expr::value(false))
            .col_expr(
                submission::Column::Kind,
                Expr::value(Self::map_kind_code(SubmissionKind::Test)),
            )
            .filter(submission::Column::UserId.eq(model.user_id.clone()))
            .filter(submission::Column::ProblemId.eq(model.problem_id.clone()))
            .filter(submission::Column::IsFinal.eq(true))
            .filter(submission::Column::Id.ne(model.id.clone()))
            .exec(conn)
            .await?;

        let mut active_model = model.into_active_model();
        active_model.is_final = Set(true);
        active_model.kind = Set(Self::map_kind_code(SubmissionKind::Final));

        let model = active_model.update(conn).await?;
        Ok(Some(model))
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let id = SubmissionId::new();
        let kind = if new_submission.is_practice {
            SubmissionKind::Practice
        } else {
            SubmissionKind::Test
        };

        let active_model = submission::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(new_submission.user_id.to_string()),
            problem_id: Set(new_submission.problem_id.to_string()),
            language: Set(Self::map_language_code(new_submission.language)),
            source_code: Set(new_submission.source_code),
            status: Set(Self::map_status_code(SubmissionStatus::Pending)),
            score: Set(0),
            execution_time_ms: Set(None),
            memory_kb: Set(None),
            is_final: Set(false),
            kind: Set(Self::map_kind_code(kind)),
            is_practice: Set(new_submission.is_practice),
            submitted_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let model = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn update_result(
        &self,
        submission_id: SubmissionId,
        update: UpdateSubmissionResult,
    ) -> Result<Option<SubmissionRecord>> {
        let Some(model) = submission::Entity::find_by_id(submission_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = model.into_active_model();
        active_model.status = Set(Self::map_status_code(update.status));
        active_model.score = Set(i32::try_from(update.score.value())?);
        active_model.execution_time_ms = Set(update.execution_time_ms);
        active_model.memory_kb = Set(update.memory_kb);

        let model = active_model.update(&self.db).await?;
        Self::map_model(model).map(Some)
    }

    async fn list_by_user_and_problems(
        &self,
        user_id: UserId,
        problem_ids: &[ProblemId],
    ) -> Result<Vec<SubmissionRecord>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id.to_string()))
            .filter(submission::Column::ProblemId.is_in(Self::problem_id_strings(problem_ids)))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_problems(&self, problem_ids: &[ProblemId]) -> Result<Vec<SubmissionRecord>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = submission::Entity::find()
            .filter(submission::Column::ProblemId.is_in(Self::problem_id_strings(problem_ids)))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn mark_as_final(&self, submission_id: SubmissionId) -> Result<Option<SubmissionRecord>> {
        let txn = self.db.begin().await?;
        let model = Self::lock_final(&txn, submission_id).await?;
        txn.commit().await?;

        model.map(Self::map_model).transpose()
    }
}
