//! 监考接口：人脸检测结果上报、实时监控、状态查询与终止。
//!
//! 人脸检测在浏览器端完成，服务端只接收检测到的人脸数量。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use hackide_api_types::{
    FaceCheckRequest, FaceCheckResponse, MonitorRequest, MonitorResponse,
    ProctoringStatusResponse, StartProctoringResponse, TerminateResponse, ViolationView,
};
use hackide_core::domain::{ProctoringState, ViolationKind};
use tracing::{info, warn};

use super::access::load_contest;
use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;
use crate::repository::{NewViolation, ProctoringSessionRecord};

fn session_not_found() -> ApiError {
    ApiError::not_found("SESSION_NOT_FOUND", "Proctoring session not found")
}

/// 进入比赛前的人脸检测，检测通过时授予一次性通行。
pub async fn face_check(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
    Json(request): Json<FaceCheckRequest>,
) -> Result<Json<FaceCheckResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;
    let mut session = state.proctoring.get_or_create(user.id, contest.id).await?;

    session.state.record_face_check(request.faces_count);
    session.details = format!("faces={}", request.faces_count);
    session.last_face_check = Some(Utc::now());
    let session = state.proctoring.save(&session).await?;

    let face_detected = session.state.face_detected;
    if face_detected {
        state
            .verification
            .grant_one_time_pass(user.id, contest.id)
            .await;
    }
    info!(
        user_id = %user.id,
        contest_id = %contest.id,
        faces_count = request.faces_count,
        face_detected,
        "face check recorded"
    );

    Ok(Json(FaceCheckResponse {
        ok: true,
        face_detected,
        faces_count: request.faces_count,
    }))
}

/// 开始实时监考，重置违规计数。
pub async fn start_monitoring(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<StartProctoringResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;
    let mut session = state.proctoring.get_or_create(user.id, contest.id).await?;

    session.state.start_monitoring();
    session.monitoring_started_at = Some(Utc::now());
    let session = state.proctoring.save(&session).await?;
    info!(user_id = %user.id, contest_id = %contest.id, "real-time proctoring started");

    Ok(Json(StartProctoringResponse {
        success: true,
        message: "Real-time proctoring started".to_string(),
        monitoring_active: session.state.monitoring_active,
    }))
}

fn violation_details(kind: ViolationKind, faces_count: u32) -> String {
    match kind {
        ViolationKind::FaceNotDetected => "No face detected in camera".to_string(),
        ViolationKind::MultipleFaces => format!("{faces_count} faces detected"),
        ViolationKind::CameraBlocked => "Unable to decode camera image".to_string(),
        ViolationKind::NoCameraAccess => "Camera access denied".to_string(),
    }
}

/// 实时监控帧上报，必要时记录违规。
pub async fn monitor(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
    Json(request): Json<MonitorRequest>,
) -> Result<Json<MonitorResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;
    let mut session = state
        .proctoring
        .find(user.id, contest.id)
        .await?
        .ok_or_else(session_not_found)?;

    if session.state.terminated {
        return Ok(Json(MonitorResponse {
            face_detected: session.state.face_detected,
            faces_count: session.state.faces_count,
            violation_added: false,
            violation_type: None,
            violation_count: session.state.violation_count,
            warning_count: session.state.warning_count,
            contest_terminated: true,
            can_continue: false,
            message: Some("Contest has been terminated due to violations".to_string()),
        }));
    }

    let violation = if request.camera_blocked {
        Some(ViolationKind::CameraBlocked)
    } else {
        session.last_face_check = Some(Utc::now());
        session.state.record_face_check(request.faces_count)
    };

    let outcome = violation.map(|kind| session.state.add_violation(kind));
    let session = state.proctoring.save(&session).await?;

    if let Some(outcome) = &outcome {
        state
            .proctoring
            .add_violation(NewViolation {
                session_id: session.id,
                kind: outcome.kind,
                details: violation_details(outcome.kind, request.faces_count),
                warning_given: outcome.warning_given,
            })
            .await?;
        warn!(
            user_id = %user.id,
            contest_id = %contest.id,
            violation = %outcome.kind,
            violation_count = outcome.violation_count,
            terminated = outcome.terminated,
            "proctoring violation recorded"
        );
    }

    Ok(Json(MonitorResponse {
        face_detected: session.state.face_detected,
        faces_count: session.state.faces_count,
        violation_added: outcome.is_some(),
        violation_type: outcome.as_ref().map(|o| o.kind.code().to_string()),
        violation_count: session.state.violation_count,
        warning_count: session.state.warning_count,
        contest_terminated: session.state.terminated,
        can_continue: session.state.can_continue(),
        message: outcome.as_ref().map(|o| o.message()),
    }))
}

fn status_response(
    state: &ProctoringState,
    session: Option<&ProctoringSessionRecord>,
) -> ProctoringStatusResponse {
    ProctoringStatusResponse {
        monitoring_active: state.monitoring_active,
        violation_count: state.violation_count,
        warning_count: state.warning_count,
        contest_terminated: state.terminated,
        practice_mode: state.practice_mode,
        can_continue: state.can_continue(),
        last_face_check: session.and_then(|s| s.last_face_check),
        violations: Vec::new(),
    }
}

/// 当前监考状态，没有会话时返回初始状态。
pub async fn status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<ProctoringStatusResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;

    let Some(session) = state.proctoring.find(user.id, contest.id).await? else {
        return Ok(Json(status_response(&ProctoringState::default(), None)));
    };

    let mut response = status_response(&session.state, Some(&session));
    response.violations = state
        .proctoring
        .list_violations(session.id)
        .await?
        .into_iter()
        .map(|violation| ViolationView {
            kind: violation.kind.code().to_string(),
            details: violation.details,
            warning_given: violation.warning_given,
            timestamp: violation.occurred_at,
        })
        .collect();

    Ok(Json(response))
}

/// 手动终止比赛。
pub async fn terminate(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<TerminateResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;
    let mut session = state
        .proctoring
        .find(user.id, contest.id)
        .await?
        .ok_or_else(session_not_found)?;

    session.state.terminate();
    state.proctoring.save(&session).await?;
    warn!(user_id = %user.id, contest_id = %contest.id, "contest terminated manually");

    Ok(Json(TerminateResponse {
        success: true,
        message: "Contest terminated".to_string(),
        contest_terminated: true,
    }))
}
