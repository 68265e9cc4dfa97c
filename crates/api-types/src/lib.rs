//! Shared request/response types used by API-facing crates.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Convenience alias for handlers that prefer a shorter type name.
pub type HealthResponse = HealthCheckResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// ---- users ----

/// Self-registration only carries a username; staff accounts are provisioned out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationSummary {
    pub contest_id: String,
    pub contest_title: String,
    pub joined_at: DateTime<Utc>,
    pub total_score: i64,
    pub problems_solved: i64,
    pub has_final_submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub participations: Vec<ParticipationSummary>,
    pub total_contests: usize,
    pub total_score: i64,
    pub has_subscription: bool,
}

// ---- contests ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_running: bool,
    pub requires_proctoring: bool,
    pub prize_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestListResponse {
    pub contests: Vec<ContestSummary>,
    pub has_subscription: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub joined_at: DateTime<Utc>,
    pub total_score: i64,
    pub problems_solved: i64,
    pub has_final_submitted: bool,
    pub final_submitted_at: Option<DateTime<Utc>>,
    pub final_submission_score: i64,
}

/// Outcome of the camera verification gate for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctoringGateView {
    pub require_proctor: bool,
    pub skip_reason: Option<String>,
    pub practice_mode: bool,
    pub practice_message: Option<String>,
    pub camera_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestProblemSummary {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub points: i64,
    pub is_premium: bool,
    pub latest_status: Option<String>,
    pub latest_submission_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDetailResponse {
    pub contest: ContestSummary,
    pub participant: ParticipantView,
    pub proctoring: ProctoringGateView,
    pub problems: Vec<ContestProblemSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAction {
    SetCameraVerified,
    MaintainCamera,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraActionRequest {
    pub action: CameraAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraActionResponse {
    pub success: bool,
    pub message: String,
}

// ---- problems and submissions ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseView {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemView {
    pub id: String,
    pub contest_id: Option<String>,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub time_limit_ms: i64,
    pub memory_limit_mb: i64,
    pub points: i64,
    pub is_premium: bool,
    pub company_tag: String,
    pub boilerplate: BTreeMap<String, String>,
    pub test_cases: Vec<TestCaseView>,
    pub proctoring: ProctoringGateView,
}

fn default_language() -> String {
    "PYTHON".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitCodeRequest {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub source_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResultResponse {
    pub submission_id: String,
    pub status: String,
    pub message: String,
    pub score: i64,
    pub passed_tests: usize,
    pub total_tests: usize,
    pub test_case: Option<usize>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub execution_time_ms: i64,
    pub memory_kb: i64,
    pub is_practice: bool,
    pub practice_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: String,
    pub problem_id: String,
    pub language: String,
    pub status: String,
    pub score: i64,
    pub execution_time_ms: Option<i64>,
    pub memory_kb: Option<i64>,
    pub is_final: bool,
    pub kind: String,
    pub is_practice: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSubmitResponse {
    pub final_score: i64,
    pub problems_finalized: usize,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub username: String,
    pub total_score: i64,
    pub problems_solved: i64,
    pub has_final_submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub contest_id: String,
    pub contest_title: String,
    pub entries: Vec<LeaderboardEntry>,
}

// ---- proctoring ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCheckRequest {
    pub faces_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCheckResponse {
    pub ok: bool,
    pub face_detected: bool,
    pub faces_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartProctoringResponse {
    pub success: bool,
    pub message: String,
    pub monitoring_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRequest {
    #[serde(default)]
    pub faces_count: u32,
    /// The client could not read a frame from the camera.
    #[serde(default)]
    pub camera_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorResponse {
    pub face_detected: bool,
    pub faces_count: u32,
    pub violation_added: bool,
    pub violation_type: Option<String>,
    pub violation_count: u32,
    pub warning_count: u32,
    pub contest_terminated: bool,
    pub can_continue: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationView {
    pub kind: String,
    pub details: String,
    pub warning_given: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctoringStatusResponse {
    pub monitoring_active: bool,
    pub violation_count: u32,
    pub warning_count: u32,
    pub contest_terminated: bool,
    pub practice_mode: bool,
    pub can_continue: bool,
    pub last_face_check: Option<DateTime<Utc>>,
    /// Newest first.
    pub violations: Vec<ViolationView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateResponse {
    pub success: bool,
    pub message: String,
    pub contest_terminated: bool,
}

// ---- premium ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanView {
    pub id: String,
    pub tier: String,
    pub display_name: String,
    pub description: String,
    pub price_inr: i64,
    pub duration_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanView>,
    pub has_subscription: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumProblemsQuery {
    pub company: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumProblemSummary {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub company_tag: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumProblemsResponse {
    pub problems: Vec<PremiumProblemSummary>,
    pub companies: Vec<String>,
    pub selected_company: String,
    pub selected_sort: String,
    pub total_count: usize,
    pub filtered_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateSubscriptionRequest {
    pub user_id: String,
    pub plan: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: String,
    pub user_id: String,
    pub plan: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

// ---- ide ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCodeRequest {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCodeResponse {
    pub compile_status: String,
    pub run_status: String,
    pub output: String,
    pub time_used_ms: u32,
    pub memory_kb: u32,
    pub message: Option<String>,
    pub stderr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCodeResponse {
    pub compile_status: String,
    /// Execution id to poll at `/api/ide/status/{he_id}`; absent in development mode.
    pub he_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatusResponse {
    pub he_id: String,
    pub compile_status: String,
    pub run_status: String,
    pub time_used_ms: u32,
    pub memory_kb: u32,
    pub output: String,
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn error_response_round_trip_json() {
        let response = ErrorResponse {
            code: "not_found".to_string(),
            message: "resource missing".to_string(),
        };

        let json = serde_json::to_string(&response).expect("serialize error response");
        let decoded: ErrorResponse =
            serde_json::from_str(&json).expect("deserialize error response");

        assert_eq!(decoded, response);
    }

    #[test]
    fn submit_request_defaults_to_python() {
        let request: SubmitCodeRequest =
            serde_json::from_str(r#"{"source_code": "print(1)"}"#).expect("deserialize submit");

        assert_eq!(request.language, "PYTHON");
    }

    #[test]
    fn camera_actions_use_snake_case() {
        let request: CameraActionRequest =
            serde_json::from_str(r#"{"action": "maintain_camera"}"#).expect("deserialize action");

        assert_eq!(request.action, CameraAction::MaintainCamera);
        assert!(serde_json::from_str::<CameraActionRequest>(r#"{"action": "other"}"#).is_err());
    }

    #[test]
    fn monitor_request_fields_are_optional() {
        let request: MonitorRequest = serde_json::from_str("{}").expect("deserialize monitor");

        assert_eq!(request.faces_count, 0);
        assert!(!request.camera_blocked);
    }
}
