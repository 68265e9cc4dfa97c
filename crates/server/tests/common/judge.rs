use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hackide_judge::JudgeConfig;
use serde_json::{Value, json};

#[derive(Default)]
struct JudgeState {
    unavailable: bool,
    statuses: VecDeque<Value>,
    submissions: Vec<Value>,
    polled: Vec<String>,
}

/// 本地模拟的评测服务，记录提交内容并按顺序返回预设状态。
#[derive(Clone, Default)]
pub struct MockJudge {
    state: Arc<Mutex<JudgeState>>,
    base_url: Arc<Mutex<String>>,
}

impl MockJudge {
    pub async fn spawn() -> Self {
        let judge = Self::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock judge should bind");
        let addr = listener.local_addr().expect("mock judge address");

        let app = Router::new()
            .route("/submissions/", post(submit))
            .route("/submissions/{he_id}/", get(status))
            .route("/output/{name}", get(output))
            .with_state(judge.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock judge should serve");
        });

        *judge.base_url.lock().expect("base url lock") = format!("http://{addr}");
        judge
    }

    /// 关闭兜底，让评测服务的错误原样暴露。
    pub fn config(&self) -> JudgeConfig {
        JudgeConfig {
            endpoint: format!("{}/submissions/", self.base_url()),
            client_secret: "test-secret".to_string(),
            fallback_enabled: false,
            ..JudgeConfig::default()
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.lock().expect("base url lock").clone()
    }

    pub fn output_url(&self, name: &str) -> String {
        format!("{}/output/{name}", self.base_url())
    }

    pub fn go_offline(&self) {
        self.state.lock().expect("state lock").unavailable = true;
    }

    pub fn push_status(&self, response: Value) {
        self.state
            .lock()
            .expect("state lock")
            .statuses
            .push_back(response);
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.state.lock().expect("state lock").submissions.clone()
    }

    pub fn polled(&self) -> Vec<String> {
        self.state.lock().expect("state lock").polled.clone()
    }
}

async fn submit(State(judge): State<MockJudge>, Json(body): Json<Value>) -> Response {
    let mut state = judge.state.lock().expect("state lock");
    if state.unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "judge unavailable").into_response();
    }

    let index = state.submissions.len();
    state.submissions.push(body);
    Json(json!({
        "he_id": format!("he-{index}"),
        "result": { "compile_status": "Compiling...", "run_status": { "status": "NA" } }
    }))
    .into_response()
}

async fn status(State(judge): State<MockJudge>, Path(he_id): Path<String>) -> Response {
    let mut state = judge.state.lock().expect("state lock");
    if state.unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "judge unavailable").into_response();
    }

    state.polled.push(he_id);
    let response = state
        .statuses
        .pop_front()
        .unwrap_or_else(|| json!({ "result": { "run_status": { "status": "Queued" } } }));
    Json(response).into_response()
}

async fn output(Path(name): Path<String>) -> String {
    format!("{name} output\n")
}
