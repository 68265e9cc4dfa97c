//! 题目查看与代码提交。

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use hackide_api_types::{
    ProblemView, ProctoringGateView, SubmissionResultResponse, SubmissionView, SubmitCodeRequest,
    TestCaseView,
};
use hackide_core::domain::{Language, SubmissionId, SubmissionStatus, boilerplate_map, grade};
use tracing::info;

use super::access::{PRACTICE_SUBMISSION_MESSAGE, authorize_contest_problem};
use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;
use crate::repository::{
    NewSolve, NewSubmission, ProblemRecord, SubmissionRecord, UpdateSubmissionResult, UserRecord,
};

pub fn problem_view(problem: &ProblemRecord, proctoring: ProctoringGateView) -> ProblemView {
    ProblemView {
        id: problem.id.to_string(),
        contest_id: problem.contest_id.map(|id| id.to_string()),
        title: problem.title.clone(),
        description: problem.description.clone(),
        difficulty: problem.difficulty.to_string(),
        time_limit_ms: i64::from(problem.time_limit_ms),
        memory_limit_mb: i64::from(problem.memory_limit_mb),
        points: i64::from(problem.points.value()),
        is_premium: problem.is_premium,
        company_tag: problem.company_tag.clone(),
        boilerplate: boilerplate_map(&problem.boilerplate, problem.signature.as_ref()),
        test_cases: problem
            .test_cases
            .iter()
            .map(|test| TestCaseView {
                input: test.input.clone(),
                output: test.output.clone(),
            })
            .collect(),
        proctoring,
    }
}

fn submission_view(submission: &SubmissionRecord) -> SubmissionView {
    SubmissionView {
        id: submission.id.to_string(),
        problem_id: submission.problem_id.to_string(),
        language: submission.language.to_string(),
        status: submission.status.to_string(),
        score: i64::from(submission.score.value()),
        execution_time_ms: submission.execution_time_ms.map(i64::from),
        memory_kb: submission.memory_kb.map(i64::from),
        is_final: submission.is_final,
        kind: submission.kind.code().to_string(),
        is_practice: submission.is_practice,
        submitted_at: submission.submitted_at,
    }
}

/// 校验请求、创建提交并同步评测。
pub async fn judge_submission(
    state: &AppState,
    user: &UserRecord,
    problem: &ProblemRecord,
    request: SubmitCodeRequest,
    is_practice: bool,
) -> Result<(SubmissionRecord, SubmissionResultResponse), ApiError> {
    let language = Language::from_str(&request.language)?;
    if request.source_code.trim().is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_SOURCE",
            "Source code cannot be empty",
        ));
    }

    let submission = state
        .submissions
        .create(NewSubmission {
            user_id: user.id,
            problem_id: problem.id,
            language,
            source_code: request.source_code,
            is_practice,
        })
        .await?;

    let report = grade(
        state.runner.as_ref(),
        language,
        &submission.source_code,
        &problem.test_cases,
        problem.points,
    )
    .await;

    let measured = matches!(
        report.status,
        SubmissionStatus::Accepted | SubmissionStatus::WrongAnswer
    );
    let submission = state
        .submissions
        .update_result(
            submission.id,
            UpdateSubmissionResult {
                status: report.status,
                score: report.score,
                execution_time_ms: measured
                    .then(|| i32::try_from(report.execution_ms).ok())
                    .flatten(),
                memory_kb: measured
                    .then(|| i32::try_from(report.memory_kb).ok())
                    .flatten(),
            },
        )
        .await?
        .ok_or_else(|| anyhow::anyhow!("submission {} disappeared while grading", submission.id))?;

    info!(
        submission_id = %submission.id,
        user_id = %user.id,
        problem_id = %problem.id,
        status = %submission.status,
        passed = report.passed,
        total = report.total,
        "submission graded"
    );

    let response = SubmissionResultResponse {
        submission_id: submission.id.to_string(),
        status: report.status.to_string(),
        message: report.message,
        score: i64::from(report.score.value()),
        passed_tests: report.passed,
        total_tests: report.total,
        test_case: report.failed_test,
        expected: report.expected,
        actual: report.actual,
        execution_time_ms: i64::from(report.execution_ms),
        memory_kb: i64::from(report.memory_kb),
        is_practice,
        practice_message: is_practice.then(|| PRACTICE_SUBMISSION_MESSAGE.to_string()),
    };

    Ok((submission, response))
}

/// 比赛题目页。
pub async fn contest_problem(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((contest_id, problem_id)): Path<(String, String)>,
) -> Result<Json<ProblemView>, ApiError> {
    let access =
        authorize_contest_problem(&state, &user, &contest_id, &problem_id, Utc::now()).await?;

    Ok(Json(problem_view(&access.problem, access.gate)))
}

/// 提交比赛题目的代码。
pub async fn submit_contest_problem(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((contest_id, problem_id)): Path<(String, String)>,
    Json(request): Json<SubmitCodeRequest>,
) -> Result<Json<SubmissionResultResponse>, ApiError> {
    let now = Utc::now();
    let access = authorize_contest_problem(&state, &user, &contest_id, &problem_id, now).await?;

    if !access.contest.is_running(now) {
        return Err(ApiError::conflict(
            "CONTEST_NOT_RUNNING",
            "Contest is not currently active. Submissions are not allowed.",
        ));
    }
    if access
        .participant
        .as_ref()
        .is_some_and(|p| p.has_final_submitted)
    {
        return Err(ApiError::conflict(
            "FINAL_ALREADY_SUBMITTED",
            "You have already made your final submission for this contest.",
        ));
    }

    let is_practice = access.is_practice();
    let (submission, response) =
        judge_submission(&state, &user, &access.problem, request, is_practice).await?;

    if submission.status == SubmissionStatus::Accepted && !is_practice {
        let contest_id = access.contest.id;
        let first_solve = state
            .participants
            .record_first_solve(NewSolve {
                user_id: user.id,
                contest_id,
                problem_id: access.problem.id,
                submission_id: submission.id,
                points: access.problem.points.value(),
            })
            .await?;
        if first_solve {
            info!(
                user_id = %user.id,
                contest_id = %contest_id,
                problem_id = %access.problem.id,
                points = access.problem.points.value(),
                "problem solved"
            );
        }
    }

    Ok(Json(response))
}

async fn load_own_submission(
    state: &AppState,
    user: &UserRecord,
    raw_id: &str,
) -> Result<SubmissionRecord, ApiError> {
    let not_found = || ApiError::not_found("SUBMISSION_NOT_FOUND", "Submission not found");
    let submission_id = SubmissionId::from_str(raw_id.trim()).map_err(|_| not_found())?;

    state
        .submissions
        .find_by_id(submission_id)
        .await?
        .filter(|submission| submission.user_id == user.id)
        .ok_or_else(not_found)
}

/// 查看自己的提交。
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionView>, ApiError> {
    let submission = load_own_submission(&state, &user, &submission_id).await?;

    Ok(Json(submission_view(&submission)))
}

/// 将提交锁定为该题的最终答案，只在比赛进行中且尚未整体提交时允许。
pub async fn mark_final(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionView>, ApiError> {
    let submission = load_own_submission(&state, &user, &submission_id).await?;
    if submission.is_practice {
        return Err(ApiError::conflict(
            "PRACTICE_SUBMISSION",
            "Practice submissions cannot be marked final",
        ));
    }

    let problem = state
        .problems
        .find_by_id(submission.problem_id)
        .await?
        .ok_or_else(ApiError::problem_not_found)?;
    let Some(contest_id) = problem.contest_id else {
        return Err(ApiError::conflict(
            "NOT_A_CONTEST_PROBLEM",
            "Only contest submissions can be marked final",
        ));
    };
    let contest = state
        .contests
        .find_by_id(contest_id)
        .await?
        .ok_or_else(ApiError::contest_not_found)?;

    if !contest.is_running(Utc::now()) {
        return Err(ApiError::conflict(
            "CONTEST_NOT_RUNNING",
            "Contest is not active",
        ));
    }
    if state
        .participants
        .find(user.id, contest.id)
        .await?
        .is_some_and(|p| p.has_final_submitted)
    {
        return Err(ApiError::final_already_submitted());
    }
    if state
        .proctoring
        .find(user.id, contest.id)
        .await?
        .is_some_and(|s| s.state.terminated)
    {
        return Err(ApiError::forbidden(
            "CONTEST_TERMINATED",
            "Contest terminated due to proctoring violations",
        ));
    }

    let submission = state
        .submissions
        .mark_as_final(submission.id)
        .await?
        .ok_or_else(|| ApiError::not_found("SUBMISSION_NOT_FOUND", "Submission not found"))?;
    info!(
        submission_id = %submission.id,
        problem_id = %submission.problem_id,
        "submission marked final"
    );

    Ok(Json(submission_view(&submission)))
}
