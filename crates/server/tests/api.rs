mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{MockJudge, TestApp};
use hackide_core::domain::{Difficulty, Language, PlanTier};
use hackide_server::repository::{NewSubmission, UserRecord};
use hackide_server::seed::seed;
use serde_json::json;

const SUM_TESTS: &[(&str, &str)] = &[("5\n3", "8"), ("10\n20", "30")];
const MAX_TESTS: &[(&str, &str)] = &[("5\n3\n9", "9"), ("1\n1\n1", "1")];

fn solve() -> serde_json::Value {
    json!({ "language": "PYTHON", "source_code": "solve" })
}

fn submit_uri(contest: &impl std::fmt::Display, problem: &impl std::fmt::Display) -> String {
    format!("/api/contests/{contest}/problems/{problem}/submissions")
}

fn final_uri(body: &serde_json::Value) -> String {
    let submission_id = body["submission_id"].as_str().expect("submission id");
    format!("/api/submissions/{submission_id}/final")
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_user_and_reject_duplicates() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/users", None, json!({ "username": "ada" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["is_staff"], false);

    let (status, body) = app
        .post("/api/users", None, json!({ "username": " ada " }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USERNAME_TAKEN");

    let (status, body) = app
        .post("/api/users", None, json!({ "username": "bad name!" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USERNAME");
}

#[tokio::test]
async fn test_registration_cannot_grant_staff() {
    let app = TestApp::new().await;
    app.premium_problem("LRU Cache", Difficulty::Hard, "Amazon", &[("lru", "ok")])
        .await;

    let (status, body) = app
        .post(
            "/api/users",
            None,
            json!({ "username": "mallory", "is_staff": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_staff"], false);

    let user: UserRecord = app
        .state
        .users
        .find_by_username("mallory")
        .await
        .expect("user lookup")
        .expect("user exists");
    assert!(!user.is_staff);

    let (status, body) = app.get("/api/premium/problems", Some(&user)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "PREMIUM_REQUIRED");
}

#[tokio::test]
async fn test_requests_without_user_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/contests", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_contest_detail_joins_and_requires_camera() {
    let app = TestApp::new().await;
    let user = app.user("grace").await;
    let contest = app.contest("Weekly Round", true, true).await;
    app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;

    let (status, body) = app.get("/api/contests", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contests"][0]["title"], "Weekly Round");
    assert_eq!(body["contests"][0]["is_running"], true);
    assert_eq!(body["has_subscription"], false);

    let uri = format!("/api/contests/{}", contest.id);
    let (status, body) = app.get(&uri, Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proctoring"]["require_proctor"], true);
    assert_eq!(body["proctoring"]["camera_verified"], false);
    assert_eq!(body["participant"]["total_score"], 0);
    assert_eq!(body["problems"][0]["title"], "Sum");
    assert!(body["problems"][0]["latest_status"].is_null());

    let participant = app
        .state
        .participants
        .find(user.id, contest.id)
        .await
        .expect("participant lookup");
    assert!(participant.is_some());
}

#[tokio::test]
async fn test_problem_requires_verification_until_face_check() {
    let app = TestApp::new().await;
    let user = app.user("linus").await;
    let contest = app.contest("Proctored", true, true).await;
    let problem = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let problem_uri = format!("/api/contests/{}/problems/{}", contest.id, problem.id);

    let (status, body) = app.get(&problem_uri, Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CAMERA_VERIFICATION_REQUIRED");

    let (status, body) = app
        .post(
            &format!("/api/contests/{}/proctor/face-check", contest.id),
            Some(&user),
            json!({ "faces_count": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["face_detected"], true);

    let (status, body) = app.get(&problem_uri, Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Sum");
    assert_eq!(body["proctoring"]["camera_verified"], true);
    assert_eq!(body["proctoring"]["require_proctor"], true);
    assert_eq!(body["test_cases"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_camera_action_verifies_contest_entry() {
    let app = TestApp::new().await;
    let user = app.user("margaret").await;
    let contest = app.contest("Camera", true, true).await;

    let (status, body) = app
        .post(
            &format!("/api/contests/{}/camera", contest.id),
            Some(&user),
            json!({ "action": "set_camera_verified" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Camera state saved");

    let (_, body) = app
        .get(&format!("/api/contests/{}", contest.id), Some(&user))
        .await;
    assert_eq!(body["proctoring"]["camera_verified"], true);
    assert_eq!(body["proctoring"]["require_proctor"], false);
}

#[tokio::test]
async fn test_problem_of_other_contest_is_not_found() {
    let app = TestApp::new().await;
    let user = app.user("ken").await;
    let first = app.contest("First", false, true).await;
    let second = app.contest("Second", false, true).await;
    let problem = app.problem(Some(&first), "Sum", 75, SUM_TESTS).await;

    let (status, body) = app
        .get(
            &format!("/api/contests/{}/problems/{}", second.id, problem.id),
            Some(&user),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROBLEM_NOT_FOUND");
}

#[tokio::test]
async fn test_first_accepted_submission_scores_once() {
    let app = TestApp::new().await;
    let user = app.user("barbara").await;
    let contest = app.contest("Open Round", false, true).await;
    let problem = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let submit_uri = format!(
        "/api/contests/{}/problems/{}/submissions",
        contest.id, problem.id
    );

    let (status, body) = app.post(&submit_uri, Some(&user), solve()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACCEPTED");
    assert_eq!(body["score"], 75);
    assert_eq!(body["passed_tests"], 2);
    assert_eq!(body["is_practice"], false);
    assert_eq!(body["execution_time_ms"], 120);

    let (status, _) = app.post(&submit_uri, Some(&user), solve()).await;
    assert_eq!(status, StatusCode::OK);

    let participant = app
        .state
        .participants
        .find(user.id, contest.id)
        .await
        .expect("participant lookup")
        .expect("participant exists");
    assert_eq!(participant.total_score, 75);
    assert_eq!(participant.problems_solved, 1);

    let submission_id = body["submission_id"].as_str().expect("submission id");
    let (status, view) = app
        .get(&format!("/api/submissions/{submission_id}"), Some(&user))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "ACCEPTED");
    assert_eq!(view["memory_kb"], 2048);

    let other = app.user("eve").await;
    let (status, _) = app
        .get(&format!("/api/submissions/{submission_id}"), Some(&other))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_answer_reports_failing_case() {
    let app = TestApp::new().await;
    let user = app.user("dennis").await;
    let contest = app.contest("Open Round", false, true).await;
    let problem = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let submit_uri = format!(
        "/api/contests/{}/problems/{}/submissions",
        contest.id, problem.id
    );

    let (status, body) = app
        .post(
            &submit_uri,
            Some(&user),
            json!({ "language": "cpp", "source_code": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WRONG_ANSWER");
    assert_eq!(body["score"], 0);
    assert_eq!(body["test_case"], 1);
    assert_eq!(body["expected"], "8");
    assert_eq!(body["actual"], "definitely not it");

    let (status, body) = app
        .post(
            &submit_uri,
            Some(&user),
            json!({ "language": "cpp", "source_code": "slow" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "TIME_LIMIT");

    let (status, body) = app
        .post(
            &submit_uri,
            Some(&user),
            json!({ "language": "COBOL", "source_code": "solve" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_LANGUAGE");

    let (status, body) = app
        .post(
            &submit_uri,
            Some(&user),
            json!({ "language": "PYTHON", "source_code": "   " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_SOURCE");
}

#[tokio::test]
async fn test_submissions_rejected_before_contest_starts() {
    let app = TestApp::new().await;
    let user = app.user("alan").await;
    let contest = app.contest("Upcoming", true, false).await;
    let problem = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;

    let (status, body) = app
        .get(
            &format!("/api/contests/{}/problems/{}", contest.id, problem.id),
            Some(&user),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proctoring"]["skip_reason"], "Contest not currently active");

    let (status, body) = app
        .post(
            &format!(
                "/api/contests/{}/problems/{}/submissions",
                contest.id, problem.id
            ),
            Some(&user),
            solve(),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONTEST_NOT_RUNNING");
    assert_eq!(app.runner.runs(), 0);
}

#[tokio::test]
async fn test_final_submit_locks_best_scores() {
    let app = TestApp::new().await;
    let user = app.user("frances").await;
    let contest = app.contest("Finals", false, true).await;
    let sum = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let max = app.problem(Some(&contest), "Max", 100, MAX_TESTS).await;
    let contest_uri = format!("/api/contests/{}", contest.id);

    let (status, body) = app
        .post(&format!("{contest_uri}/final-submit"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_REGISTERED");

    app.get(&contest_uri, Some(&user)).await;
    for problem in [&sum, &max] {
        let (status, body) = app
            .post(
                &format!("{contest_uri}/problems/{}/submissions", problem.id),
                Some(&user),
                solve(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ACCEPTED");
    }

    let (status, body) = app
        .post(&format!("{contest_uri}/final-submit"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_score"], 175);
    assert_eq!(body["problems_finalized"], 2);
    assert_eq!(body["message"], "Final submission successful! Score: 175 points");

    let (status, body) = app
        .post(&format!("{contest_uri}/final-submit"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FINAL_ALREADY_SUBMITTED");

    let (status, body) = app
        .post(
            &format!("{contest_uri}/problems/{}/submissions", sum.id),
            Some(&user),
            solve(),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FINAL_ALREADY_SUBMITTED");

    let (_, body) = app.get(&contest_uri, Some(&user)).await;
    assert_eq!(body["participant"]["has_final_submitted"], true);
    assert_eq!(body["participant"]["final_submission_score"], 175);
    assert_eq!(body["proctoring"]["skip_reason"], "Contest already submitted");
}

#[tokio::test]
async fn test_concurrent_solves_are_all_credited() {
    let app = TestApp::new().await;
    let user = app.user("katherine").await;
    let rival = app.user("dorothy").await;
    let contest = app.contest("Rush", false, true).await;
    let sum = app.problem(Some(&contest), "Sum", 100, SUM_TESTS).await;
    let max = app.problem(Some(&contest), "Max", 100, MAX_TESTS).await;
    let sum_uri = submit_uri(&contest.id, &sum.id);
    let max_uri = submit_uri(&contest.id, &max.id);

    let ((first, _), (second, _)) = tokio::join!(
        app.post(&sum_uri, Some(&user), solve()),
        app.post(&max_uri, Some(&user), solve()),
    );
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let participant = app
        .state
        .participants
        .find(user.id, contest.id)
        .await
        .expect("participant lookup")
        .expect("participant exists");
    assert_eq!(participant.total_score, 200);
    assert_eq!(participant.problems_solved, 2);

    let ((first, _), (second, _)) = tokio::join!(
        app.post(&sum_uri, Some(&rival), solve()),
        app.post(&sum_uri, Some(&rival), solve()),
    );
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let participant = app
        .state
        .participants
        .find(rival.id, contest.id)
        .await
        .expect("participant lookup")
        .expect("participant exists");
    assert_eq!(participant.total_score, 100);
    assert_eq!(participant.problems_solved, 1);
}

#[tokio::test]
async fn test_concurrent_final_submits_finalize_once() {
    let app = TestApp::new().await;
    let user = app.user("mary").await;
    let contest = app.contest("Finals", false, true).await;
    let sum = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let contest_uri = format!("/api/contests/{}", contest.id);

    app.get(&contest_uri, Some(&user)).await;
    app.post(&submit_uri(&contest.id, &sum.id), Some(&user), solve())
        .await;

    let final_submit = format!("{contest_uri}/final-submit");
    let ((first, _), (second, _)) = tokio::join!(
        app.post(&final_submit, Some(&user), json!({})),
        app.post(&final_submit, Some(&user), json!({})),
    );
    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let participant = app
        .state
        .participants
        .find(user.id, contest.id)
        .await
        .expect("participant lookup")
        .expect("participant exists");
    assert!(participant.has_final_submitted);
    assert_eq!(participant.final_submission_score, 75);
}

#[tokio::test]
async fn test_mark_final_moves_lock_between_submissions() {
    let app = TestApp::new().await;
    let user = app.user("annie").await;
    let other = app.user("eve").await;
    let contest = app.contest("Locks", false, true).await;
    let sum = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let uri = submit_uri(&contest.id, &sum.id);

    let (_, first) = app.post(&uri, Some(&user), solve()).await;
    let (_, second) = app.post(&uri, Some(&user), solve()).await;

    let (status, body) = app.post(&final_uri(&first), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_final"], true);
    assert_eq!(body["kind"], "FINAL");

    let (status, _) = app.post(&final_uri(&first), Some(&other), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.post(&final_uri(&second), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_final"], true);

    let first_id = first["submission_id"].as_str().expect("submission id");
    let (_, body) = app
        .get(&format!("/api/submissions/{first_id}"), Some(&user))
        .await;
    assert_eq!(body["is_final"], false);
    assert_eq!(body["kind"], "TEST");

    let (status, _) = app
        .post(
            &format!("/api/contests/{}/final-submit", contest.id),
            Some(&user),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post(&final_uri(&first), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FINAL_ALREADY_SUBMITTED");
}

#[tokio::test]
async fn test_mark_final_refuses_locked_contexts() {
    let app = TestApp::new().await;
    let staff = app.staff("grace").await;
    let user = app.user("joan").await;
    let running = app.contest("Running", false, true).await;
    let upcoming = app.contest("Upcoming", false, false).await;
    let sum = app.problem(Some(&running), "Sum", 75, SUM_TESTS).await;
    let later = app.problem(Some(&upcoming), "Later", 50, SUM_TESTS).await;
    let lru = app
        .premium_problem("LRU Cache", Difficulty::Hard, "Amazon", &[("lru", "ok")])
        .await;

    let (status, body) = app
        .post(
            &format!("/api/premium/problems/{}/submissions", lru.id),
            Some(&staff),
            solve(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.post(&final_uri(&body), Some(&staff), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOT_A_CONTEST_PROBLEM");

    let mut stored = Vec::new();
    for (problem, is_practice) in [(&later, false), (&sum, true)] {
        let submission = app
            .state
            .submissions
            .create(NewSubmission {
                user_id: user.id,
                problem_id: problem.id,
                language: Language::Python,
                source_code: "solve".to_string(),
                is_practice,
            })
            .await
            .expect("submission should be created");
        stored.push(json!({ "submission_id": submission.id.to_string() }));
    }

    let (status, body) = app.post(&final_uri(&stored[0]), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONTEST_NOT_RUNNING");

    let (status, body) = app.post(&final_uri(&stored[1]), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PRACTICE_SUBMISSION");

    let (_, accepted) = app
        .post(&submit_uri(&running.id, &sum.id), Some(&user), solve())
        .await;
    let contest_uri = format!("/api/contests/{}", running.id);
    app.post(&format!("{contest_uri}/proctoring/start"), Some(&user), json!({}))
        .await;
    let (status, _) = app
        .post(&format!("{contest_uri}/proctoring/terminate"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post(&final_uri(&accepted), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CONTEST_TERMINATED");

    let submission = app
        .state
        .submissions
        .list_by_user_and_problems(user.id, &[sum.id])
        .await
        .expect("submissions");
    assert!(submission.iter().all(|s| !s.is_final));
}

#[tokio::test]
async fn test_leaderboard_orders_by_score() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let carol = app.user("carol").await;
    let contest = app.contest("Ranked", false, true).await;
    let sum = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let max = app.problem(Some(&contest), "Max", 100, MAX_TESTS).await;
    let contest_uri = format!("/api/contests/{}", contest.id);

    for user in [&alice, &bob, &carol] {
        app.get(&contest_uri, Some(user)).await;
    }
    for (user, problem) in [(&alice, &sum), (&bob, &sum), (&bob, &max)] {
        app.post(
            &format!("{contest_uri}/problems/{}/submissions", problem.id),
            Some(user),
            solve(),
        )
        .await;
    }

    let (status, body) = app
        .get(&format!("{contest_uri}/leaderboard"), Some(&carol))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contest_title"], "Ranked");

    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["username"], "bob");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["total_score"], 175);
    assert_eq!(entries[1]["username"], "alice");
    assert_eq!(entries[1]["rank"], 2);
}

#[tokio::test]
async fn test_violations_terminate_and_switch_to_practice() {
    let app = TestApp::new().await;
    let user = app.user("hedy").await;
    let contest = app.contest("Watched", true, true).await;
    let problem = app.problem(Some(&contest), "Sum", 75, SUM_TESTS).await;
    let contest_uri = format!("/api/contests/{}", contest.id);
    let monitor_uri = format!("{contest_uri}/proctoring/monitor");

    let (status, body) = app
        .post(&monitor_uri, Some(&user), json!({ "faces_count": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");

    app.get(&contest_uri, Some(&user)).await;
    app.post(
        &format!("{contest_uri}/proctor/face-check"),
        Some(&user),
        json!({ "faces_count": 1 }),
    )
    .await;
    let (status, body) = app
        .post(&format!("{contest_uri}/proctoring/start"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monitoring_active"], true);

    let (_, body) = app
        .post(&monitor_uri, Some(&user), json!({ "faces_count": 1 }))
        .await;
    assert_eq!(body["violation_added"], false);
    assert_eq!(body["can_continue"], true);

    let (_, body) = app
        .post(&monitor_uri, Some(&user), json!({ "faces_count": 0 }))
        .await;
    assert_eq!(body["violation_added"], true);
    assert_eq!(body["violation_type"], "FACE_NOT_DETECTED");
    assert_eq!(body["message"], "Warning 1/2: Face Not Detected");

    let (_, body) = app
        .post(&monitor_uri, Some(&user), json!({ "faces_count": 2 }))
        .await;
    assert_eq!(body["violation_type"], "MULTIPLE_FACES");
    assert_eq!(body["warning_count"], 2);
    assert_eq!(body["contest_terminated"], false);

    let (_, body) = app
        .post(&monitor_uri, Some(&user), json!({ "camera_blocked": true }))
        .await;
    assert_eq!(body["violation_type"], "CAMERA_BLOCKED");
    assert_eq!(body["violation_count"], 3);
    assert_eq!(body["contest_terminated"], true);
    assert_eq!(body["can_continue"], false);
    assert_eq!(body["message"], "Contest terminated due to multiple violations");

    let (_, body) = app
        .post(&monitor_uri, Some(&user), json!({ "faces_count": 0 }))
        .await;
    assert_eq!(body["violation_added"], false);
    assert_eq!(body["message"], "Contest has been terminated due to violations");

    let (_, body) = app.get(&contest_uri, Some(&user)).await;
    assert_eq!(body["proctoring"]["practice_mode"], true);
    assert_eq!(body["proctoring"]["require_proctor"], false);

    let (status, body) = app
        .post(
            &format!("{contest_uri}/problems/{}/submissions", problem.id),
            Some(&user),
            solve(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACCEPTED");
    assert_eq!(body["is_practice"], true);
    assert!(body["practice_message"].is_string());

    let participant = app
        .state
        .participants
        .find(user.id, contest.id)
        .await
        .expect("participant lookup")
        .expect("participant exists");
    assert_eq!(participant.total_score, 0);

    let (status, body) = app
        .post(&format!("{contest_uri}/final-submit"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "CONTEST_TERMINATED");

    let (_, body) = app
        .get(&format!("{contest_uri}/proctoring/status"), Some(&user))
        .await;
    assert_eq!(body["contest_terminated"], true);
    assert_eq!(body["practice_mode"], true);
    assert_eq!(body["monitoring_active"], false);

    let violations = body["violations"].as_array().expect("violations list");
    let kinds: Vec<&str> = violations
        .iter()
        .map(|v| v["kind"].as_str().expect("violation kind"))
        .collect();
    assert_eq!(
        kinds,
        ["CAMERA_BLOCKED", "MULTIPLE_FACES", "FACE_NOT_DETECTED"]
    );
    assert_eq!(violations[0]["warning_given"], false);
    assert_eq!(violations[2]["warning_given"], true);
}

#[tokio::test]
async fn test_manual_termination() {
    let app = TestApp::new().await;
    let user = app.user("radia").await;
    let contest = app.contest("Manual", true, true).await;
    let contest_uri = format!("/api/contests/{}", contest.id);

    let (_, body) = app
        .get(&format!("{contest_uri}/proctoring/status"), Some(&user))
        .await;
    assert_eq!(body["monitoring_active"], false);
    assert_eq!(body["can_continue"], true);

    let (status, _) = app
        .post(&format!("{contest_uri}/proctoring/terminate"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post(&format!("{contest_uri}/proctoring/start"), Some(&user), json!({}))
        .await;
    let (status, body) = app
        .post(&format!("{contest_uri}/proctoring/terminate"), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contest_terminated"], true);
    assert_eq!(body["message"], "Contest terminated");
}

#[tokio::test]
async fn test_premium_catalog_requires_subscription() {
    let app = TestApp::new().await;
    let staff = app.staff("admin").await;
    let user = app.user("katherine").await;
    app.plan(PlanTier::Free, 0).await;
    app.plan(PlanTier::Pro, 499).await;
    let lru = app
        .premium_problem("LRU Cache", Difficulty::Hard, "Amazon", &[("lru", "ok")])
        .await;
    app.premium_problem("Two Sum II", Difficulty::Easy, "Google", &[("ts", "0 1")])
        .await;
    app.premium_problem("Add Binary", Difficulty::Easy, "Amazon", &[("ab", "100")])
        .await;

    let (status, body) = app.get("/api/premium/problems", Some(&user)).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "PREMIUM_REQUIRED");

    let (status, body) = app
        .post(
            "/api/admin/subscriptions",
            Some(&user),
            json!({ "user_id": user.id.to_string(), "plan": "PRO" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "STAFF_ONLY");

    let (status, body) = app
        .post(
            "/api/admin/subscriptions",
            Some(&staff),
            json!({ "user_id": user.id.to_string(), "plan": "pro" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["plan"], "PRO");
    assert_eq!(body["is_active"], true);

    let (status, body) = app.get("/api/premium/plans", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_subscription"], true);
    assert_eq!(body["plans"][0]["tier"], "FREE");
    assert_eq!(body["plans"][1]["price_inr"], 499);

    let (status, body) = app
        .get("/api/premium/problems?company=Amazon&sort=hard-easy", Some(&user))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["filtered_count"], 2);
    assert_eq!(body["problems"][0]["title"], "LRU Cache");
    assert_eq!(body["problems"][1]["title"], "Add Binary");
    assert_eq!(body["companies"], json!(["Amazon", "Google"]));
    assert_eq!(body["selected_company"], "Amazon");
    assert_eq!(body["selected_sort"], "hard-easy");

    let (status, body) = app
        .post(
            &format!("/api/premium/problems/{}/submissions", lru.id),
            Some(&user),
            solve(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACCEPTED");
    assert_eq!(body["score"], 100);

    let (_, body) = app.get("/api/profile", Some(&user)).await;
    assert_eq!(body["has_subscription"], true);
    assert_eq!(body["total_contests"], 0);
}

#[tokio::test]
async fn test_activation_validates_plan_and_user() {
    let app = TestApp::new().await;
    let staff = app.staff("root").await;
    let user = app.user("mary").await;

    let (status, body) = app
        .post(
            "/api/admin/subscriptions",
            Some(&staff),
            json!({ "user_id": user.id.to_string(), "plan": "GOLD" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PLAN");

    let (status, body) = app
        .post(
            "/api/admin/subscriptions",
            Some(&staff),
            json!({ "user_id": user.id.to_string(), "plan": "PREMIUM" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PLAN_NOT_FOUND");

    app.plan(PlanTier::Premium, 999).await;
    let (status, body) = app
        .post(
            "/api/admin/subscriptions",
            Some(&staff),
            json!({ "user_id": "not-a-user", "plan": "PREMIUM" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_ide_run_reports_judge_outcomes() {
    let app = TestApp::new().await;
    let user = app.user("sophie").await;
    app.problem(None, "Sum", 75, SUM_TESTS).await;

    let (status, body) = app
        .post(
            "/api/ide/run",
            Some(&user),
            json!({ "language": "PYTHON", "source": "solve", "input": "5\n3" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compile_status"], "OK");
    assert_eq!(body["run_status"], "AC");
    assert_eq!(body["output"], "8\n");

    let (status, body) = app
        .post(
            "/api/ide/run",
            Some(&user),
            json!({ "language": "JAVA", "source": "broken" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compile_status"], "CE");
    assert_eq!(body["message"], "Compilation Error");

    let (status, body) = app
        .post(
            "/api/ide/run",
            Some(&user),
            json!({ "language": "PYTHON", "source": "offline" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "JUDGE_UNAVAILABLE");

    let (status, body) = app
        .post("/api/ide/run", Some(&user), json!({ "language": "PYTHON" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Source can't be empty!");
}

#[tokio::test]
async fn test_ide_compile_submits_compile_only_request() {
    let judge = MockJudge::spawn().await;
    let app = TestApp::with_judge(judge.config()).await;
    let user = app.user("lynn").await;

    let (status, body) = app
        .post(
            "/api/ide/compile",
            Some(&user),
            json!({ "language": "cpp", "source": "int main() { return 0; }" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["he_id"], "he-0");
    assert_eq!(body["compile_status"], "Compiling...");

    let submissions = judge.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["lang"], "CPP17");
    assert_eq!(submissions[0]["input"], "");
    let context: serde_json::Value =
        serde_json::from_str(submissions[0]["context"].as_str().expect("context string"))
            .expect("context json");
    assert_eq!(context, json!({ "request_type": "compile_only" }));

    let (status, body) = app
        .post("/api/ide/compile", Some(&user), json!({ "language": "cpp" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_SOURCE");
    assert_eq!(judge.submissions().len(), 1);

    judge.go_offline();
    let (status, body) = app
        .post(
            "/api/ide/compile",
            Some(&user),
            json!({ "language": "cpp", "source": "int main() {}" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "JUDGE_UNAVAILABLE");
}

#[tokio::test]
async fn test_ide_status_reports_run_details() {
    let judge = MockJudge::spawn().await;
    let app = TestApp::with_judge(judge.config()).await;
    let user = app.user("radia").await;

    judge.push_status(json!({
        "he_id": "he-7",
        "result": {
            "compile_status": "OK",
            "run_status": {
                "status": "AC",
                "output": judge.output_url("sum"),
                "time_used": "0.25",
                "memory_used": 65536,
                "stderr": ""
            }
        }
    }));
    let (status, body) = app.get("/api/ide/status/he-7", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["he_id"], "he-7");
    assert_eq!(body["compile_status"], "OK");
    assert_eq!(body["run_status"], "AC");
    assert_eq!(body["time_used_ms"], 250);
    assert_eq!(body["memory_kb"], 64);
    assert_eq!(body["output"], "sum output");

    judge.push_status(json!({
        "result": {
            "compile_status": "OK",
            "run_status": { "status": "RE", "stderr": "ZeroDivisionError: division by zero" }
        }
    }));
    let (_, body) = app.get("/api/ide/status/he-8", Some(&user)).await;
    assert_eq!(body["run_status"], "RE");
    assert_eq!(body["stderr"], "ZeroDivisionError: division by zero");
    assert_eq!(body["output"], "Processing...");

    let (_, body) = app.get("/api/ide/status/he-9", Some(&user)).await;
    assert_eq!(body["run_status"], "Queued");
    assert_eq!(body["compile_status"], "Unknown");
    assert_eq!(judge.polled(), ["he-7", "he-8", "he-9"]);

    let (status, body) = app.get("/api/ide/status/he..7", Some(&user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_EXECUTION_ID");

    let (status, _) = app.get("/api/ide/status/he-7", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    judge.go_offline();
    let (status, body) = app.get("/api/ide/status/he-10", Some(&user)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "JUDGE_UNAVAILABLE");
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = TestApp::new().await;

    let first = seed(&app.state, Utc::now()).await.expect("first seed");
    assert_eq!(first.contests_created, 2);
    assert_eq!(first.problems_created, 6);
    assert_eq!(first.plans_created, 3);

    let second = seed(&app.state, Utc::now()).await.expect("second seed");
    assert_eq!(second.contests_created, 0);
    assert_eq!(second.problems_created, 0);
    assert_eq!(second.plans_created, 0);

    let active = app.state.contests.list_active().await.expect("contests");
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].title, "Algorithm Master");
}
