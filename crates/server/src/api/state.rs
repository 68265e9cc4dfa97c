//! 统一的应用状态。

use std::sync::Arc;

use hackide_core::domain::CodeRunner;
use hackide_judge::JudgeClient;
use sea_orm::DatabaseConnection;

use crate::repository::{
    ContestRepository, ParticipantRepository, ProblemRepository, ProctoringRepository,
    SeaOrmContestRepository, SeaOrmParticipantRepository, SeaOrmProblemRepository,
    SeaOrmProctoringRepository, SeaOrmSubmissionRepository, SeaOrmSubscriptionRepository,
    SeaOrmUserRepository, SubmissionRepository, SubscriptionRepository, UserRepository,
};
use crate::verification::VerificationStore;

/// 统一的应用状态，包含所有路由共享的仓储与服务。
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub contests: Arc<dyn ContestRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub proctoring: Arc<dyn ProctoringRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    /// 代码评测执行器。
    pub runner: Arc<dyn CodeRunner>,
    /// 在线 IDE 直接访问评测服务的客户端。
    pub judge: JudgeClient,
    /// 摄像头验证标记。
    pub verification: VerificationStore,
}

impl AppState {
    /// 基于数据库连接、评测执行器和评测客户端创建应用状态。
    pub fn new(db: DatabaseConnection, runner: Arc<dyn CodeRunner>, judge: JudgeClient) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            contests: Arc::new(SeaOrmContestRepository::new(db.clone())),
            problems: Arc::new(SeaOrmProblemRepository::new(db.clone())),
            submissions: Arc::new(SeaOrmSubmissionRepository::new(db.clone())),
            participants: Arc::new(SeaOrmParticipantRepository::new(db.clone())),
            proctoring: Arc::new(SeaOrmProctoringRepository::new(db.clone())),
            subscriptions: Arc::new(SeaOrmSubscriptionRepository::new(db)),
            runner,
            judge,
            verification: VerificationStore::new(),
        }
    }
}
