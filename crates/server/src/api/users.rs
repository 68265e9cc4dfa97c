//! 用户注册与个人主页。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use hackide_api_types::{
    CreateUserRequest, ParticipationSummary, ProfileResponse, UserResponse,
};
use hackide_core::domain::Username;
use tracing::info;

use super::access::has_premium;
use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;
use crate::repository::{NewUser, UserRecord};

pub fn user_response(user: &UserRecord) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

/// 注册用户。
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = Username::new(request.username)?;

    if state.users.find_by_username(username.as_str()).await?.is_some() {
        return Err(ApiError::conflict(
            "USERNAME_TAKEN",
            "A user with that username already exists.",
        ));
    }

    let user = state
        .users
        .create(NewUser {
            username,
            is_staff: false,
        })
        .await?;
    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(user_response(&user))))
}

/// 当前用户的参赛记录与订阅状态。
pub async fn profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let participations = state.participants.list_by_user(user.id).await?;

    let mut summaries = Vec::with_capacity(participations.len());
    for participation in &participations {
        let contest_title = state
            .contests
            .find_by_id(participation.contest_id)
            .await?
            .map(|contest| contest.title)
            .unwrap_or_default();

        summaries.push(ParticipationSummary {
            contest_id: participation.contest_id.to_string(),
            contest_title,
            joined_at: participation.joined_at,
            total_score: i64::from(participation.total_score),
            problems_solved: i64::from(participation.problems_solved),
            has_final_submitted: participation.has_final_submitted,
        });
    }

    let total_score = summaries.iter().map(|s| s.total_score).sum();
    let has_subscription = has_premium(&state, &user, Utc::now()).await?;

    Ok(Json(ProfileResponse {
        user: user_response(&user),
        total_contests: summaries.len(),
        participations: summaries,
        total_score,
        has_subscription,
    }))
}
