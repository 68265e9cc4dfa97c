//! 当前用户提取器。
//!
//! 认证由上游代理完成，这里只信任 `x-user-id` 请求头。

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hackide_core::domain::UserId;

use super::error::ApiError;
use super::state::AppState;
use crate::repository::UserRecord;

pub const USER_ID_HEADER: &str = "x-user-id";

/// 已认证的当前用户。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        let user_id = UserId::from_str(raw.trim())
            .map_err(|_| ApiError::unauthorized("Invalid user id"))?;

        state
            .users
            .find_by_id(user_id)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))
    }
}
