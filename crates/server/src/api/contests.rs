//! 比赛列表、详情、排行榜与整体提交。

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use hackide_api_types::{
    CameraAction, CameraActionRequest, CameraActionResponse, ContestDetailResponse,
    ContestListResponse, ContestProblemSummary, ContestSummary, FinalSubmitResponse,
    LeaderboardEntry, LeaderboardResponse, ParticipantView,
};
use hackide_core::domain::{
    ProblemId, Standing, SubmissionId, SubmissionStatus, evaluate_contest_entry,
    rank_participants,
};
use tracing::info;

use super::access::{ensure_practice_mode, gate_input, gate_view, has_premium, load_contest};
use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;
use crate::repository::{ContestRecord, ParticipantRecord};

pub fn contest_summary(contest: &ContestRecord, now: DateTime<Utc>) -> ContestSummary {
    ContestSummary {
        id: contest.id.to_string(),
        title: contest.title.clone(),
        description: contest.description.clone(),
        start_time: contest.window.start,
        end_time: contest.window.end,
        is_running: contest.is_running(now),
        requires_proctoring: contest.requires_proctoring,
        prize_summary: contest.prizes.summary(),
    }
}

fn participant_view(participant: &ParticipantRecord) -> ParticipantView {
    ParticipantView {
        joined_at: participant.joined_at,
        total_score: i64::from(participant.total_score),
        problems_solved: i64::from(participant.problems_solved),
        has_final_submitted: participant.has_final_submitted,
        final_submitted_at: participant.final_submitted_at,
        final_submission_score: i64::from(participant.final_submission_score),
    }
}

/// 进行中的比赛列表，按开始时间倒序。
pub async fn list_contests(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ContestListResponse>, ApiError> {
    let now = Utc::now();
    let contests = state.contests.list_active().await?;

    Ok(Json(ContestListResponse {
        contests: contests
            .iter()
            .map(|contest| contest_summary(contest, now))
            .collect(),
        has_subscription: has_premium(&state, &user, now).await?,
    }))
}

/// 比赛详情：首次访问时报名，并执行摄像头校验。
pub async fn contest_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<ContestDetailResponse>, ApiError> {
    let now = Utc::now();
    let contest = load_contest(&state, &contest_id).await?;

    let (participant, created) = state
        .participants
        .get_or_create(user.id, contest.id)
        .await?;
    if created {
        info!(user_id = %user.id, contest_id = %contest.id, "participant joined contest");
    }

    let mut session = state.proctoring.find(user.id, contest.id).await?;
    let input = gate_input(&contest, now, Some(&participant), session.as_ref());
    let decision = state
        .verification
        .update(user.id, contest.id, |flags| {
            evaluate_contest_entry(&input, flags)
        })
        .await;
    if decision.practice_mode {
        if let Some(session) = session.as_mut() {
            ensure_practice_mode(&state, session).await?;
        }
    }

    let problems = state.problems.list_by_contest(contest.id).await?;
    let problem_ids: Vec<ProblemId> = problems.iter().map(|p| p.id).collect();
    let submissions = state
        .submissions
        .list_by_user_and_problems(user.id, &problem_ids)
        .await?;

    let mut latest = HashMap::new();
    for submission in &submissions {
        latest.entry(submission.problem_id).or_insert(submission);
    }

    let problems = problems
        .iter()
        .map(|problem| {
            let last = latest.get(&problem.id);
            ContestProblemSummary {
                id: problem.id.to_string(),
                title: problem.title.clone(),
                difficulty: problem.difficulty.to_string(),
                points: i64::from(problem.points.value()),
                is_premium: problem.is_premium,
                latest_status: last.map(|s| s.status.to_string()),
                latest_submission_time: last.map(|s| s.submitted_at),
            }
        })
        .collect();

    Ok(Json(ContestDetailResponse {
        contest: contest_summary(&contest, now),
        participant: participant_view(&participant),
        proctoring: gate_view(
            decision.require_proctor,
            decision.skip_reason,
            decision.practice_mode,
            decision.camera_verified,
        ),
        problems,
    }))
}

/// 保存客户端上报的摄像头状态。
pub async fn camera_action(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
    Json(request): Json<CameraActionRequest>,
) -> Result<Json<CameraActionResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;

    let message = match request.action {
        CameraAction::SetCameraVerified => {
            state
                .verification
                .set_camera_verified(user.id, contest.id)
                .await;
            "Camera state saved"
        }
        CameraAction::MaintainCamera => {
            state.verification.maintain_camera(user.id, contest.id).await;
            "Camera maintained"
        }
    };

    Ok(Json(CameraActionResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// 排行榜，只统计有正式提交的参赛者。
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let contest = load_contest(&state, &contest_id).await?;

    let problems = state.problems.list_by_contest(contest.id).await?;
    let problem_ids: Vec<ProblemId> = problems.iter().map(|p| p.id).collect();
    let submissions = state.submissions.list_by_problems(&problem_ids).await?;

    let mut ranked_submissions = HashMap::new();
    for submission in submissions.iter().filter(|s| !s.is_practice) {
        *ranked_submissions.entry(submission.user_id).or_insert(0u32) += 1;
    }

    let participants = state.participants.list_by_contest(contest.id).await?;
    let mut standings = Vec::with_capacity(participants.len());
    for participant in participants {
        let username = state
            .users
            .find_by_id(participant.user_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();

        standings.push(Standing {
            user_id: participant.user_id,
            username,
            total_score: participant.total_score,
            problems_solved: participant.problems_solved,
            has_final_submitted: participant.has_final_submitted,
            non_practice_submissions: ranked_submissions
                .get(&participant.user_id)
                .copied()
                .unwrap_or_default(),
        });
    }

    let entries = rank_participants(standings)
        .into_iter()
        .map(|row| LeaderboardEntry {
            rank: row.rank,
            user_id: row.user_id.to_string(),
            username: row.username,
            total_score: i64::from(row.total_score),
            problems_solved: i64::from(row.problems_solved),
            has_final_submitted: row.has_final_submitted,
        })
        .collect();

    Ok(Json(LeaderboardResponse {
        contest_id: contest.id.to_string(),
        contest_title: contest.title,
        entries,
    }))
}

/// 整体提交：每题取最高的正式通过分数，锁定为最终提交。
pub async fn final_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(contest_id): Path<String>,
) -> Result<Json<FinalSubmitResponse>, ApiError> {
    let now = Utc::now();
    let contest = load_contest(&state, &contest_id).await?;

    if !contest.is_running(now) {
        return Err(ApiError::conflict(
            "CONTEST_NOT_RUNNING",
            "Contest is not active",
        ));
    }

    let participant = state
        .participants
        .find(user.id, contest.id)
        .await?
        .ok_or_else(|| {
            ApiError::forbidden(
                "NOT_REGISTERED",
                "You are not registered for this contest",
            )
        })?;
    if participant.has_final_submitted {
        return Err(ApiError::final_already_submitted());
    }

    let terminated = state
        .proctoring
        .find(user.id, contest.id)
        .await?
        .is_some_and(|s| s.state.terminated);
    if terminated {
        return Err(ApiError::forbidden(
            "CONTEST_TERMINATED",
            "Contest terminated due to proctoring violations",
        ));
    }

    let problems = state.problems.list_by_contest(contest.id).await?;
    let problem_ids: Vec<ProblemId> = problems.iter().map(|p| p.id).collect();
    let submissions = state
        .submissions
        .list_by_user_and_problems(user.id, &problem_ids)
        .await?;

    let mut best: HashMap<ProblemId, (u32, SubmissionId)> = HashMap::new();
    for submission in submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Accepted && !s.is_practice)
    {
        let score = submission.score.value();
        best.entry(submission.problem_id)
            .and_modify(|entry| {
                if score > entry.0 {
                    *entry = (score, submission.id);
                }
            })
            .or_insert((score, submission.id));
    }

    let final_score: u32 = best.values().map(|(score, _)| score).sum();
    let final_submissions: Vec<SubmissionId> = best.values().map(|(_, id)| *id).collect();
    // 并发的重复请求只有一个能把 has_final_submitted 从假改为真。
    let participant = state
        .participants
        .record_final_submission(user.id, contest.id, final_score, now, &final_submissions)
        .await?
        .ok_or_else(ApiError::final_already_submitted)?;

    info!(
        user_id = %user.id,
        contest_id = %contest.id,
        final_score,
        problems = best.len(),
        "final submission recorded"
    );

    Ok(Json(FinalSubmitResponse {
        final_score: i64::from(final_score),
        problems_finalized: best.len(),
        submitted_at: participant.final_submitted_at.unwrap_or(now),
        message: format!("Final submission successful! Score: {final_score} points"),
    }))
}
