//! API 路由模块。
//!
//! 所有接口挂载在 `/api` 下，以 JSON 交互。

pub mod access;
pub mod auth;
pub mod contests;
pub mod error;
pub mod ide;
pub mod premium;
pub mod problems;
pub mod proctoring;
pub mod state;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use hackide_api_types::HealthResponse;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use error::ApiError;
pub use state::AppState;

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// 创建完整的 API 路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        // 用户
        .route("/users", post(users::create_user))
        .route("/profile", get(users::profile))
        // 比赛
        .route("/contests", get(contests::list_contests))
        .route("/contests/{contest_id}", get(contests::contest_detail))
        .route("/contests/{contest_id}/camera", post(contests::camera_action))
        .route(
            "/contests/{contest_id}/leaderboard",
            get(contests::leaderboard),
        )
        .route(
            "/contests/{contest_id}/final-submit",
            post(contests::final_submit),
        )
        // 题目与提交
        .route(
            "/contests/{contest_id}/problems/{problem_id}",
            get(problems::contest_problem),
        )
        .route(
            "/contests/{contest_id}/problems/{problem_id}/submissions",
            post(problems::submit_contest_problem),
        )
        .route("/submissions/{submission_id}", get(problems::get_submission))
        .route(
            "/submissions/{submission_id}/final",
            post(problems::mark_final),
        )
        // 监考
        .route(
            "/contests/{contest_id}/proctor/face-check",
            post(proctoring::face_check),
        )
        .route(
            "/contests/{contest_id}/proctoring/start",
            post(proctoring::start_monitoring),
        )
        .route(
            "/contests/{contest_id}/proctoring/monitor",
            post(proctoring::monitor),
        )
        .route(
            "/contests/{contest_id}/proctoring/status",
            get(proctoring::status),
        )
        .route(
            "/contests/{contest_id}/proctoring/terminate",
            post(proctoring::terminate),
        )
        // 付费内容
        .route("/premium/plans", get(premium::list_plans))
        .route("/premium/problems", get(premium::list_problems))
        .route("/premium/problems/{problem_id}", get(premium::get_problem))
        .route(
            "/premium/problems/{problem_id}/submissions",
            post(premium::submit_problem),
        )
        .route("/admin/subscriptions", post(premium::activate_subscription))
        // 在线 IDE
        .route("/ide/compile", post(ide::compile_code))
        .route("/ide/run", post(ide::run_code))
        .route("/ide/status/{he_id}", get(ide::execution_status));

    Router::new().nest("/api", api).with_state(state)
}
