use crate::entity::{proctoring_session, proctoring_violation};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hackide_core::domain::{ContestId, ProctoringState, UserId, ViolationKind};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProctoringSessionRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub contest_id: ContestId,
    pub state: ProctoringState,
    pub details: String,
    pub last_face_check: Option<DateTime<Utc>>,
    pub monitoring_started_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ViolationRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub kind: ViolationKind,
    pub details: String,
    pub warning_given: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewViolation {
    pub session_id: Uuid,
    pub kind: ViolationKind,
    pub details: String,
    pub warning_given: bool,
}

#[async_trait]
pub trait ProctoringRepository: Send + Sync {
    async fn find(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<Option<ProctoringSessionRecord>>;
    async fn get_or_create(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<ProctoringSessionRecord>;
    /// 保存会话的可变字段。
    async fn save(&self, session: &ProctoringSessionRecord) -> Result<ProctoringSessionRecord>;
    async fn add_violation(&self, violation: NewViolation) -> Result<ViolationRecord>;
    /// 会话的违规记录，最新的在前。
    async fn list_violations(&self, session_id: Uuid) -> Result<Vec<ViolationRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmProctoringRepository {
    db: DatabaseConnection,
}

impl SeaOrmProctoringRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_kind(code: i16) -> Result<ViolationKind> {
        match code {
            0 => Ok(ViolationKind::FaceNotDetected),
            1 => Ok(ViolationKind::MultipleFaces),
            2 => Ok(ViolationKind::CameraBlocked),
            3 => Ok(ViolationKind::NoCameraAccess),
            _ => Err(anyhow!(
                "invalid proctoring_violation.kind code from database: {code}"
            )),
        }
    }

    fn map_kind_code(kind: ViolationKind) -> i16 {
        match kind {
            ViolationKind::FaceNotDetected => 0,
            ViolationKind::MultipleFaces => 1,
            ViolationKind::CameraBlocked => 2,
            ViolationKind::NoCameraAccess => 3,
        }
    }

    fn counter(column: &str, value: i32) -> Result<u32> {
        u32::try_from(value).map_err(|_| {
            anyhow!(
                "invalid proctoring_session.{column} from database: {value} (must be non-negative)"
            )
        })
    }

    fn map_session(model: proctoring_session::Model) -> Result<ProctoringSessionRecord> {
        let id = Uuid::parse_str(&model.id).map_err(|e| {
            anyhow!(
                "invalid proctoring_session.id '{}' from database: {e}",
                model.id
            )
        })?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid proctoring_session.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let contest_id = ContestId::from_str(&model.contest_id).map_err(|e| {
            anyhow!(
                "invalid proctoring_session.contest_id '{}' from database: {e}",
                model.contest_id
            )
        })?;

        Ok(ProctoringSessionRecord {
            id,
            user_id,
            contest_id,
            state: ProctoringState {
                monitoring_active: model.is_monitoring_active,
                violation_count: Self::counter("violation_count", model.violation_count)?,
                warning_count: Self::counter("warning_count", model.warning_count)?,
                terminated: model.contest_terminated,
                practice_mode: model.practice_mode,
                face_detected: model.face_detected,
                faces_count: Self::counter("faces_count", model.faces_count)?,
            },
            details: model.details,
            last_face_check: model.last_face_check.map(|at| at.and_utc()),
            monitoring_started_at: model.monitoring_started_at.map(|at| at.and_utc()),
            created_at: model.created_at.and_utc(),
        })
    }

    fn map_violation(model: proctoring_violation::Model) -> Result<ViolationRecord> {
        let id = Uuid::parse_str(&model.id).map_err(|e| {
            anyhow!(
                "invalid proctoring_violation.id '{}' from database: {e}",
                model.id
            )
        })?;
        let session_id = Uuid::parse_str(&model.session_id).map_err(|e| {
            anyhow!(
                "invalid proctoring_violation.session_id '{}' from database: {e}",
                model.session_id
            )
        })?;

        Ok(ViolationRecord {
            id,
            session_id,
            kind: Self::map_kind(model.kind)?,
            details: model.details,
            warning_given: model.warning_given,
            occurred_at: model.occurred_at.and_utc(),
        })
    }

    async fn find_model(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<Option<proctoring_session::Model>> {
        let model = proctoring_session::Entity::find()
            .filter(proctoring_session::Column::UserId.eq(user_id.to_string()))
            .filter(proctoring_session::Column::ContestId.eq(contest_id.to_string()))
            .one(&self.db)
            .await?;

        Ok(model)
    }
}

#[async_trait]
impl ProctoringRepository for SeaOrmProctoringRepository {
    async fn find(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<Option<ProctoringSessionRecord>> {
        self.find_model(user_id, contest_id)
            .await?
            .map(Self::map_session)
            .transpose()
    }

    async fn get_or_create(
        &self,
        user_id: UserId,
        contest_id: ContestId,
    ) -> Result<ProctoringSessionRecord> {
        if let Some(model) = self.find_model(user_id, contest_id).await? {
            return Self::map_session(model);
        }

        let active_model = proctoring_session::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            contest_id: Set(contest_id.to_string()),
            face_detected: Set(false),
            faces_count: Set(0),
            details: Set(String::new()),
            is_monitoring_active: Set(false),
            violation_count: Set(0),
            warning_count: Set(0),
            contest_terminated: Set(false),
            practice_mode: Set(false),
            last_face_check: Set(None),
            monitoring_started_at: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_session(model)
    }

    async fn save(&self, session: &ProctoringSessionRecord) -> Result<ProctoringSessionRecord> {
        let model = proctoring_session::Entity::find_by_id(session.id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("proctoring session {} no longer exists", session.id))?;

        let state = &session.state;
        let mut active_model = model.into_active_model();
        active_model.face_detected = Set(state.face_detected);
        active_model.faces_count = Set(i32::try_from(state.faces_count)?);
        active_model.details = Set(session.details.clone());
        active_model.is_monitoring_active = Set(state.monitoring_active);
        active_model.violation_count = Set(i32::try_from(state.violation_count)?);
        active_model.warning_count = Set(i32::try_from(state.warning_count)?);
        active_model.contest_terminated = Set(state.terminated);
        active_model.practice_mode = Set(state.practice_mode);
        active_model.last_face_check = Set(session.last_face_check.map(|at| at.naive_utc()));
        active_model.monitoring_started_at =
            Set(session.monitoring_started_at.map(|at| at.naive_utc()));

        let model = active_model.update(&self.db).await?;
        Self::map_session(model)
    }

    async fn add_violation(&self, violation: NewViolation) -> Result<ViolationRecord> {
        let active_model = proctoring_violation::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            session_id: Set(violation.session_id.to_string()),
            kind: Set(Self::map_kind_code(violation.kind)),
            details: Set(violation.details),
            warning_given: Set(violation.warning_given),
            occurred_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_violation(model)
    }

    async fn list_violations(&self, session_id: Uuid) -> Result<Vec<ViolationRecord>> {
        let models = proctoring_violation::Entity::find()
            .filter(proctoring_violation::Column::SessionId.eq(session_id.to_string()))
            .order_by_desc(proctoring_violation::Column::OccurredAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_violation).collect()
    }
}
