use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hackide_judge::JudgeConfig;
use serde_json::{Value, json};

#[derive(Default)]
struct MockState {
    submit_status: Option<StatusCode>,
    omit_he_id: bool,
    statuses: VecDeque<Value>,
    submissions: Vec<Value>,
    secrets: Vec<String>,
    polls: usize,
}

/// 本地模拟的评测服务，脚本化返回状态查询结果。
#[derive(Clone, Default)]
pub struct MockJudge {
    state: Arc<Mutex<MockState>>,
    base_url: Arc<Mutex<String>>,
}

impl MockJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock judge should bind");
        let addr = listener.local_addr().expect("mock judge address");

        let app = Router::new()
            .route("/submissions/", post(submit))
            .route("/submissions/{he_id}/", get(status))
            .route("/output/{name}", get(output))
            .with_state(self.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock judge should serve");
        });

        let base = format!("http://{addr}");
        *self.base_url.lock().expect("base url lock") = base.clone();
        base
    }

    pub fn config(&self, base: &str) -> JudgeConfig {
        JudgeConfig {
            endpoint: format!("{base}/submissions/"),
            client_secret: "test-secret".to_string(),
            poll_attempts: 3,
            poll_interval_ms: 1,
            ..JudgeConfig::default()
        }
    }

    pub fn output_url(&self, name: &str) -> String {
        format!("{}/output/{name}", self.base_url.lock().expect("base url lock"))
    }

    pub fn fail_submit(&self, status: StatusCode) {
        self.state.lock().expect("state lock").submit_status = Some(status);
    }

    pub fn omit_he_id(&self) {
        self.state.lock().expect("state lock").omit_he_id = true;
    }

    pub fn push_status(&self, response: Value) {
        self.state
            .lock()
            .expect("state lock")
            .statuses
            .push_back(response);
    }

    pub fn push_run_status(&self, run_status: Value) {
        self.push_status(json!({
            "result": { "compile_status": "OK", "run_status": run_status }
        }));
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.state.lock().expect("state lock").submissions.clone()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.state.lock().expect("state lock").secrets.clone()
    }

    pub fn polls(&self) -> usize {
        self.state.lock().expect("state lock").polls
    }
}

async fn submit(
    State(judge): State<MockJudge>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = judge.state.lock().expect("state lock");
    if let Some(secret) = headers.get("client-secret").and_then(|v| v.to_str().ok()) {
        state.secrets.push(secret.to_string());
    }
    let index = state.submissions.len();
    state.submissions.push(body);

    if let Some(status) = state.submit_status {
        return (status, "judge unavailable").into_response();
    }

    if state.omit_he_id {
        return Json(json!({ "result": { "compile_status": "Compiling..." } })).into_response();
    }

    Json(json!({
        "he_id": format!("he-{index}"),
        "result": { "compile_status": "Compiling...", "run_status": { "status": "NA" } }
    }))
    .into_response()
}

async fn status(State(judge): State<MockJudge>, Path(_he_id): Path<String>) -> Json<Value> {
    let mut state = judge.state.lock().expect("state lock");
    state.polls += 1;
    let response = state
        .statuses
        .pop_front()
        .unwrap_or_else(|| json!({ "result": { "run_status": { "status": "Queued" } } }));
    Json(response)
}

async fn output(Path(name): Path<String>) -> String {
    match name.as_str() {
        "sum" => "8\n".to_string(),
        other => format!("{other}\n"),
    }
}
