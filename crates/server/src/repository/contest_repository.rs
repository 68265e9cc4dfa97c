use crate::entity::contest;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hackide_core::domain::{ContestId, ContestWindow, Prizes};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ContestRecord {
    pub id: ContestId,
    pub title: String,
    pub description: String,
    pub window: ContestWindow,
    pub is_active: bool,
    pub prizes: Prizes,
    pub requires_proctoring: bool,
    pub created_at: DateTime<Utc>,
}

impl ContestRecord {
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.window.is_running(now)
    }
}

#[derive(Debug, Clone)]
pub struct NewContest {
    pub title: String,
    pub description: String,
    pub window: ContestWindow,
    pub is_active: bool,
    pub prizes: Prizes,
    pub requires_proctoring: bool,
}

#[async_trait]
pub trait ContestRepository: Send + Sync {
    async fn create(&self, new_contest: NewContest) -> Result<ContestRecord>;
    async fn find_by_id(&self, contest_id: ContestId) -> Result<Option<ContestRecord>>;
    async fn find_by_title(&self, title: &str) -> Result<Option<ContestRecord>>;
    /// 启用中的比赛，按开始时间倒序。
    async fn list_active(&self) -> Result<Vec<ContestRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmContestRepository {
    db: DatabaseConnection,
}

impl SeaOrmContestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: contest::Model) -> Result<ContestRecord> {
        let id = ContestId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid contest.id '{}' from database: {e}", model.id))?;

        Ok(ContestRecord {
            id,
            title: model.title,
            description: model.description,
            window: ContestWindow::new(model.start_time.and_utc(), model.end_time.and_utc()),
            is_active: model.is_active,
            prizes: Prizes {
                first: model.first_prize,
                second: model.second_prize,
                third: model.third_prize,
            },
            requires_proctoring: model.requires_proctoring,
            created_at: model.created_at.and_utc(),
        })
    }
}

#[async_trait]
impl ContestRepository for SeaOrmContestRepository {
    async fn create(&self, new_contest: NewContest) -> Result<ContestRecord> {
        let id = ContestId::new();

        let active_model = contest::ActiveModel {
            id: Set(id.to_string()),
            title: Set(new_contest.title),
            description: Set(new_contest.description),
            start_time: Set(new_contest.window.start.naive_utc()),
            end_time: Set(new_contest.window.end.naive_utc()),
            is_active: Set(new_contest.is_active),
            first_prize: Set(new_contest.prizes.first),
            second_prize: Set(new_contest.prizes.second),
            third_prize: Set(new_contest.prizes.third),
            requires_proctoring: Set(new_contest.requires_proctoring),
            created_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, contest_id: ContestId) -> Result<Option<ContestRecord>> {
        let model = contest::Entity::find_by_id(contest_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<ContestRecord>> {
        let model = contest::Entity::find()
            .filter(contest::Column::Title.eq(title))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_active(&self) -> Result<Vec<ContestRecord>> {
        let models = contest::Entity::find()
            .filter(contest::Column::IsActive.eq(true))
            .order_by_desc(contest::Column::StartTime)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
