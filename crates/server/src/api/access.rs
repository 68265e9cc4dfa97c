//! 比赛、题目访问的公共校验逻辑。

use std::str::FromStr;

use chrono::{DateTime, Utc};
use hackide_api_types::ProctoringGateView;
use hackide_core::domain::{
    ContestId, GateInput, ProblemAccess, ProblemId, SkipReason, evaluate_problem_access,
    has_premium_access,
};
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{
    ContestRecord, ParticipantRecord, ProblemRecord, ProctoringSessionRecord, UserRecord,
};

pub const PRACTICE_PAGE_MESSAGE: &str =
    "You are in practice mode. Submissions will not count toward the leaderboard.";

pub const PRACTICE_SUBMISSION_MESSAGE: &str =
    "🎯 Practice Mode: This submission does not count toward the leaderboard.";

/// 按路径参数加载比赛，不存在或格式错误时返回 404。
pub async fn load_contest(state: &AppState, raw_id: &str) -> Result<ContestRecord, ApiError> {
    let contest_id =
        ContestId::from_str(raw_id.trim()).map_err(|_| ApiError::contest_not_found())?;

    state
        .contests
        .find_by_id(contest_id)
        .await?
        .ok_or_else(ApiError::contest_not_found)
}

/// 按路径参数加载题目。
pub async fn load_problem(state: &AppState, raw_id: &str) -> Result<ProblemRecord, ApiError> {
    let problem_id =
        ProblemId::from_str(raw_id.trim()).map_err(|_| ApiError::problem_not_found())?;

    state
        .problems
        .find_by_id(problem_id)
        .await?
        .ok_or_else(ApiError::problem_not_found)
}

/// 用户是否可以访问付费内容：管理员或持有有效订阅。
pub async fn has_premium(
    state: &AppState,
    user: &UserRecord,
    now: DateTime<Utc>,
) -> Result<bool, ApiError> {
    if user.is_staff {
        return Ok(true);
    }

    let subscriptions = state.subscriptions.list_by_user(user.id).await?;
    Ok(has_premium_access(
        user.is_staff,
        subscriptions.iter().map(|s| &s.window),
        now,
    ))
}

/// 已终止的监考会话切换为练习模式并保存。
pub async fn ensure_practice_mode(
    state: &AppState,
    session: &mut ProctoringSessionRecord,
) -> Result<(), ApiError> {
    if !session.state.terminated || session.state.practice_mode {
        return Ok(());
    }

    session.state.enable_practice_mode();
    *session = state.proctoring.save(session).await?;
    info!(
        user_id = %session.user_id,
        contest_id = %session.contest_id,
        "practice mode enabled after termination"
    );
    Ok(())
}

/// 组装摄像头校验的输入。
pub fn gate_input(
    contest: &ContestRecord,
    now: DateTime<Utc>,
    participant: Option<&ParticipantRecord>,
    session: Option<&ProctoringSessionRecord>,
) -> GateInput {
    GateInput {
        requires_proctoring: contest.requires_proctoring,
        is_running: contest.is_running(now),
        has_final_submitted: participant.is_some_and(|p| p.has_final_submitted),
        terminated: session.is_some_and(|s| s.state.terminated),
        face_detected: session.is_some_and(|s| s.state.face_detected),
    }
}

/// 比赛题目页的访问结果。
pub struct ContestProblemAccess {
    pub contest: ContestRecord,
    pub problem: ProblemRecord,
    pub participant: Option<ParticipantRecord>,
    pub session: Option<ProctoringSessionRecord>,
    pub gate: ProctoringGateView,
}

impl ContestProblemAccess {
    pub fn is_practice(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.state.terminated)
    }
}

/// 比赛题目的访问校验：摄像头验证在前，付费校验在后。
pub async fn authorize_contest_problem(
    state: &AppState,
    user: &UserRecord,
    contest_raw: &str,
    problem_raw: &str,
    now: DateTime<Utc>,
) -> Result<ContestProblemAccess, ApiError> {
    let contest = load_contest(state, contest_raw).await?;
    let problem = load_problem(state, problem_raw).await?;
    if problem.contest_id != Some(contest.id) {
        return Err(ApiError::problem_not_found());
    }

    let mut session = state.proctoring.find(user.id, contest.id).await?;
    if let Some(session) = session.as_mut() {
        ensure_practice_mode(state, session).await?;
    }
    let participant = state.participants.find(user.id, contest.id).await?;

    let input = gate_input(&contest, now, participant.as_ref(), session.as_ref());
    let access = state
        .verification
        .update(user.id, contest.id, |flags| {
            evaluate_problem_access(&input, flags)
        })
        .await;

    let gate = match access {
        ProblemAccess::VerificationRequired => {
            return Err(ApiError::forbidden(
                "CAMERA_VERIFICATION_REQUIRED",
                "Contest camera verification required. Please return to the contest page to complete face verification before accessing problems.",
            ));
        }
        ProblemAccess::Allowed {
            practice_mode,
            require_proctor,
            skip_reason,
        } => gate_view(require_proctor, skip_reason, practice_mode, skip_reason.is_none()),
    };

    if problem.is_premium && !has_premium(state, user, now).await? {
        return Err(ApiError::premium_required());
    }

    Ok(ContestProblemAccess {
        contest,
        problem,
        participant,
        session,
        gate,
    })
}

pub fn gate_view(
    require_proctor: bool,
    skip_reason: Option<SkipReason>,
    practice_mode: bool,
    camera_verified: bool,
) -> ProctoringGateView {
    ProctoringGateView {
        require_proctor,
        skip_reason: skip_reason.map(|reason| reason.message().to_string()),
        practice_mode,
        practice_message: practice_mode.then(|| PRACTICE_PAGE_MESSAGE.to_string()),
        camera_verified,
    }
}
