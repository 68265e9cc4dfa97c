//! 付费计划、付费题库与订阅开通。

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use hackide_api_types::{
    ActivateSubscriptionRequest, PlanView, PlansResponse, PremiumProblemSummary,
    PremiumProblemsQuery, PremiumProblemsResponse, ProblemView, ProctoringGateView,
    SubmissionResultResponse, SubmitCodeRequest, SubscriptionView,
};
use hackide_core::domain::{CatalogEntry, PlanTier, PremiumFilter, UserId, company_tags};
use tracing::info;

use super::access::{has_premium, load_problem};
use super::auth::CurrentUser;
use super::error::ApiError;
use super::problems::{judge_submission, problem_view};
use super::state::AppState;
use crate::repository::{ProblemRecord, UserRecord};

async fn require_premium(state: &AppState, user: &UserRecord) -> Result<(), ApiError> {
    if has_premium(state, user, Utc::now()).await? {
        Ok(())
    } else {
        Err(ApiError::premium_required())
    }
}

async fn load_premium_problem(state: &AppState, raw_id: &str) -> Result<ProblemRecord, ApiError> {
    let problem = load_problem(state, raw_id).await?;
    if problem.is_premium {
        Ok(problem)
    } else {
        Err(ApiError::problem_not_found())
    }
}

/// 可购买的计划，按价格升序。
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PlansResponse>, ApiError> {
    let plans = state.subscriptions.list_active_plans().await?;

    Ok(Json(PlansResponse {
        plans: plans
            .into_iter()
            .map(|plan| PlanView {
                id: plan.id.to_string(),
                tier: plan.tier.code().to_string(),
                display_name: plan.display_name,
                description: plan.description,
                price_inr: plan.price_inr,
                duration_days: plan.duration_days,
            })
            .collect(),
        has_subscription: has_premium(&state, &user, Utc::now()).await?,
    }))
}

/// 付费题库，支持按公司过滤和按难度排序。
pub async fn list_problems(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PremiumProblemsQuery>,
) -> Result<Json<PremiumProblemsResponse>, ApiError> {
    require_premium(&state, &user).await?;

    let problems = state.problems.list_premium().await?;
    let companies = company_tags(problems.iter().map(|p| p.company_tag.as_str()));
    let total_count = problems.len();

    let entries: Vec<CatalogEntry> = problems
        .into_iter()
        .map(|problem| CatalogEntry {
            id: problem.id,
            title: problem.title,
            difficulty: problem.difficulty,
            company_tag: problem.company_tag,
            points: problem.points.value(),
        })
        .collect();

    let filter = PremiumFilter::new(query.company.as_deref(), query.sort.as_deref());
    let filtered = filter.apply(entries);

    Ok(Json(PremiumProblemsResponse {
        filtered_count: filtered.len(),
        problems: filtered
            .into_iter()
            .map(|entry| PremiumProblemSummary {
                id: entry.id.to_string(),
                title: entry.title,
                difficulty: entry.difficulty.to_string(),
                company_tag: entry.company_tag,
                points: i64::from(entry.points),
            })
            .collect(),
        companies,
        selected_company: filter.company.unwrap_or_else(|| "all".to_string()),
        selected_sort: filter.sort.code().to_string(),
        total_count,
    }))
}

/// 付费题目详情。
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(problem_id): Path<String>,
) -> Result<Json<ProblemView>, ApiError> {
    let problem = load_premium_problem(&state, &problem_id).await?;
    require_premium(&state, &user).await?;

    Ok(Json(problem_view(&problem, ProctoringGateView::default())))
}

/// 提交付费题目，不计入任何比赛排行。
pub async fn submit_problem(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(problem_id): Path<String>,
    Json(request): Json<SubmitCodeRequest>,
) -> Result<Json<SubmissionResultResponse>, ApiError> {
    let problem = load_premium_problem(&state, &problem_id).await?;
    require_premium(&state, &user).await?;

    let (_, response) = judge_submission(&state, &user, &problem, request, false).await?;

    Ok(Json(response))
}

/// 管理员为用户开通订阅。
pub async fn activate_subscription(
    State(state): State<Arc<AppState>>,
    CurrentUser(staff): CurrentUser,
    Json(request): Json<ActivateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionView>), ApiError> {
    if !staff.is_staff {
        return Err(ApiError::forbidden(
            "STAFF_ONLY",
            "Only staff can activate subscriptions",
        ));
    }

    let tier = PlanTier::from_str(&request.plan)?;
    let user_id = UserId::from_str(request.user_id.trim())
        .map_err(|_| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;
    let plan = state
        .subscriptions
        .find_plan_by_tier(tier)
        .await?
        .filter(|plan| plan.is_active)
        .ok_or_else(|| ApiError::not_found("PLAN_NOT_FOUND", "Plan not found"))?;

    let subscription = state
        .subscriptions
        .activate(user.id, &plan, Utc::now())
        .await?;
    info!(
        user_id = %user.id,
        plan = %plan.tier,
        end_date = %subscription.window.end,
        staff_id = %staff.id,
        "subscription activated"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionView {
            id: subscription.id.to_string(),
            user_id: subscription.user_id.to_string(),
            plan: plan.tier.code().to_string(),
            start_date: subscription.window.start,
            end_date: subscription.window.end,
            is_active: subscription.window.is_active,
        }),
    ))
}
