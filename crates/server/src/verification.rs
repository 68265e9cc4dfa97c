//! 摄像头验证状态存储。
//!
//! 每个 (用户, 比赛) 对应一组请求会话级的验证标记，只保存在内存中。

use std::collections::HashMap;
use std::sync::Arc;

use hackide_core::domain::{CameraFlags, ContestId, UserId};
use tokio::sync::RwLock;
use tracing::info;

/// 摄像头验证标记存储。
#[derive(Clone, Default)]
pub struct VerificationStore {
    flags: Arc<RwLock<HashMap<(UserId, ContestId), CameraFlags>>>,
}

impl VerificationStore {
    /// 创建空的存储。
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取当前标记，不存在时返回全空标记。
    pub async fn get(&self, user_id: UserId, contest_id: ContestId) -> CameraFlags {
        let flags = self.flags.read().await;
        flags.get(&(user_id, contest_id)).copied().unwrap_or_default()
    }

    /// 在写锁内修改标记，返回闭包的结果。
    pub async fn update<R>(
        &self,
        user_id: UserId,
        contest_id: ContestId,
        f: impl FnOnce(&mut CameraFlags) -> R,
    ) -> R {
        let mut flags = self.flags.write().await;
        let entry = flags.entry((user_id, contest_id)).or_default();
        let result = f(entry);
        if !entry.any() {
            flags.remove(&(user_id, contest_id));
        }
        result
    }

    /// 人脸检测通过后授予一次性通行。
    #[tracing::instrument(skip(self))]
    pub async fn grant_one_time_pass(&self, user_id: UserId, contest_id: ContestId) {
        info!(user_id = %user_id, contest_id = %contest_id, "one-time camera pass granted");
        self.update(user_id, contest_id, |flags| flags.one_time_pass = true)
            .await;
    }

    /// 客户端确认摄像头已验证。
    #[tracing::instrument(skip(self))]
    pub async fn set_camera_verified(&self, user_id: UserId, contest_id: ContestId) {
        info!(user_id = %user_id, contest_id = %contest_id, "camera verified by client");
        self.update(user_id, contest_id, |flags| {
            flags.camera_verified = true;
            flags.camera_active = true;
        })
        .await;
    }

    /// 客户端保持摄像头处于活动状态。
    pub async fn maintain_camera(&self, user_id: UserId, contest_id: ContestId) {
        self.update(user_id, contest_id, |flags| flags.camera_active = true)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flags_are_scoped_to_user_and_contest() {
        let store = VerificationStore::new();
        let user = UserId::new();
        let contest = ContestId::new();

        store.set_camera_verified(user, contest).await;

        let flags = store.get(user, contest).await;
        assert!(flags.camera_verified);
        assert!(flags.camera_active);
        assert!(!flags.one_time_pass);
        assert_eq!(store.get(user, ContestId::new()).await, CameraFlags::default());
        assert_eq!(store.get(UserId::new(), contest).await, CameraFlags::default());
    }

    #[tokio::test]
    async fn cleared_flags_are_dropped() {
        let store = VerificationStore::new();
        let user = UserId::new();
        let contest = ContestId::new();

        store.grant_one_time_pass(user, contest).await;
        store.maintain_camera(user, contest).await;
        store.update(user, contest, CameraFlags::clear).await;

        assert!(store.flags.read().await.is_empty());
    }
}
