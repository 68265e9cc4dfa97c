use crate::entity::{subscription, subscription_plan};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hackide_core::domain::{PlanId, PlanTier, SubscriptionWindow, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PlanRecord {
    pub id: PlanId,
    pub tier: PlanTier,
    pub display_name: String,
    pub description: String,
    pub price_inr: i64,
    pub duration_days: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub tier: PlanTier,
    pub display_name: String,
    pub description: String,
    pub price_inr: i64,
    pub duration_days: u32,
}

#[derive(Debug, Clone)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub window: SubscriptionWindow,
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create_plan(&self, new_plan: NewPlan) -> Result<PlanRecord>;
    async fn find_plan_by_tier(&self, tier: PlanTier) -> Result<Option<PlanRecord>>;
    /// 启用中的套餐，价格从低到高。
    async fn list_active_plans(&self) -> Result<Vec<PlanRecord>>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<SubscriptionRecord>>;
    /// 停用用户当前的订阅，并按 `plan` 开通新订阅。
    async fn activate(
        &self,
        user_id: UserId,
        plan: &PlanRecord,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionRecord>;
}

#[derive(Clone)]
pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_tier(code: i16) -> Result<PlanTier> {
        match code {
            0 => Ok(PlanTier::Free),
            1 => Ok(PlanTier::Pro),
            2 => Ok(PlanTier::Premium),
            _ => Err(anyhow!(
                "invalid subscription_plan.tier code from database: {code}"
            )),
        }
    }

    fn map_tier_code(tier: PlanTier) -> i16 {
        match tier {
            PlanTier::Free => 0,
            PlanTier::Pro => 1,
            PlanTier::Premium => 2,
        }
    }

    fn map_plan(model: subscription_plan::Model) -> Result<PlanRecord> {
        let id = PlanId::from_str(&model.id).map_err(|e| {
            anyhow!(
                "invalid subscription_plan.id '{}' from database: {e}",
                model.id
            )
        })?;
        let duration_days = u32::try_from(model.duration_days).map_err(|_| {
            anyhow!(
                "invalid subscription_plan.duration_days from database: {}",
                model.duration_days
            )
        })?;

        Ok(PlanRecord {
            id,
            tier: Self::map_tier(model.tier)?,
            display_name: model.display_name,
            description: model.description,
            price_inr: model.price_inr,
            duration_days,
            is_active: model.is_active,
        })
    }

    fn map_subscription(model: subscription::Model) -> Result<SubscriptionRecord> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|e| anyhow!("invalid subscription.id '{}' from database: {e}", model.id))?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid subscription.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let plan_id = PlanId::from_str(&model.plan_id).map_err(|e| {
            anyhow!(
                "invalid subscription.plan_id '{}' from database: {e}",
                model.plan_id
            )
        })?;

        Ok(SubscriptionRecord {
            id,
            user_id,
            plan_id,
            window: SubscriptionWindow {
                start: model.start_date.and_utc(),
                end: model.end_date.and_utc(),
                is_active: model.is_active,
            },
            auto_renew: model.auto_renew,
            created_at: model.created_at.and_utc(),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create_plan(&self, new_plan: NewPlan) -> Result<PlanRecord> {
        let id = PlanId::new();

        let active_model = subscription_plan::ActiveModel {
            id: Set(id.to_string()),
            tier: Set(Self::map_tier_code(new_plan.tier)),
            display_name: Set(new_plan.display_name),
            description: Set(new_plan.description),
            price_inr: Set(new_plan.price_inr),
            duration_days: Set(i32::try_from(new_plan.duration_days)?),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_plan(model)
    }

    async fn find_plan_by_tier(&self, tier: PlanTier) -> Result<Option<PlanRecord>> {
        let model = subscription_plan::Entity::find()
            .filter(subscription_plan::Column::Tier.eq(Self::map_tier_code(tier)))
            .one(&self.db)
            .await?;

        model.map(Self::map_plan).transpose()
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanRecord>> {
        let models = subscription_plan::Entity::find()
            .filter(subscription_plan::Column::IsActive.eq(true))
            .order_by_asc(subscription_plan::Column::PriceInr)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_plan).collect()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<SubscriptionRecord>> {
        let models = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(subscription::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_subscription).collect()
    }

    async fn activate(
        &self,
        user_id: UserId,
        plan: &PlanRecord,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionRecord> {
        let window = SubscriptionWindow::starting(now, plan.duration_days);
        let txn = self.db.begin().await?;

        subscription::Entity::update_many()
            .col_expr(subscription::Column::IsActive, Expr::value(false))
            .filter(subscription::Column::UserId.eq(user_id.to_string()))
            .filter(subscription::Column::IsActive.eq(true))
            .filter(subscription::Column::EndDate.gte(now.naive_utc()))
            .exec(&txn)
            .await?;

        let active_model = subscription::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            plan_id: Set(plan.id.to_string()),
            start_date: Set(window.start.naive_utc()),
            end_date: Set(window.end.naive_utc()),
            is_active: Set(window.is_active),
            auto_renew: Set(false),
            created_at: Set(now.naive_utc()),
        };

        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        Self::map_subscription(model)
    }
}
