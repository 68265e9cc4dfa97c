#![allow(dead_code)]

mod judge;

pub use judge::MockJudge;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, Utc};
use hackide_core::domain::{
    CodeRunner, ContestWindow, Difficulty, PlanTier, Prizes, RunOutput, RunRequest, RunnerError,
    Score, TestCase, Username,
};
use hackide_judge::{JudgeClient, JudgeConfig};
use hackide_server::api::{AppState, USER_ID_HEADER, create_router};
use hackide_server::db::init_pool_and_migrate;
use hackide_server::repository::{
    ContestRecord, NewContest, NewPlan, NewProblem, NewUser, PlanRecord, ProblemRecord, UserRecord,
};
use serde_json::Value;
use tower::ServiceExt;

/// 按输入查表返回期望输出的评测器。
///
/// 源码 `solve` 输出正确答案，`wrong` 输出错误答案，`slow` 超时，
/// `broken` 编译失败，`offline` 模拟评测服务不可用。
#[derive(Default)]
pub struct OracleRunner {
    answers: Mutex<HashMap<String, String>>,
    runs: Mutex<usize>,
}

impl OracleRunner {
    pub fn learn(&self, tests: &[TestCase]) {
        let mut answers = self.answers.lock().expect("answers lock");
        for test in tests {
            answers.insert(test.input.clone(), test.output.clone());
        }
    }

    pub fn runs(&self) -> usize {
        *self.runs.lock().expect("runs lock")
    }
}

#[async_trait]
impl CodeRunner for OracleRunner {
    async fn run(&self, request: RunRequest) -> Result<RunOutput, RunnerError> {
        *self.runs.lock().expect("runs lock") += 1;

        let output = match request.source_code.trim() {
            "solve" => self
                .answers
                .lock()
                .expect("answers lock")
                .get(&request.input)
                .cloned()
                .unwrap_or_default(),
            "wrong" => "definitely not it".to_string(),
            "slow" => return Err(RunnerError::TimeLimit),
            "broken" => return Err(RunnerError::Compilation),
            "offline" => return Err(RunnerError::Unavailable("connection refused".to_string())),
            other => other.to_string(),
        };

        Ok(RunOutput {
            output: format!("{output}\n"),
            execution_ms: 120,
            memory_kb: 2048,
        })
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub runner: Arc<OracleRunner>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_judge(JudgeConfig::default()).await
    }

    /// 在线 IDE 的编译与状态接口直连 `judge` 指向的评测服务。
    pub async fn with_judge(judge: JudgeConfig) -> Self {
        let db = init_pool_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database should migrate");
        let runner = Arc::new(OracleRunner::default());
        let state = Arc::new(AppState::new(db, runner.clone(), JudgeClient::new(judge)));
        let router = create_router(state.clone());

        Self {
            state,
            router,
            runner,
        }
    }

    pub async fn user(&self, username: &str) -> UserRecord {
        self.create_user(username, false).await
    }

    pub async fn staff(&self, username: &str) -> UserRecord {
        self.create_user(username, true).await
    }

    async fn create_user(&self, username: &str, is_staff: bool) -> UserRecord {
        self.state
            .users
            .create(NewUser {
                username: Username::new(username).expect("valid username"),
                is_staff,
            })
            .await
            .expect("user should be created")
    }

    /// 创建比赛；`running` 为假时比赛在一小时后才开始。
    pub async fn contest(&self, title: &str, requires_proctoring: bool, running: bool) -> ContestRecord {
        let now = Utc::now();
        let start = if running {
            now - Duration::hours(1)
        } else {
            now + Duration::hours(1)
        };

        self.state
            .contests
            .create(NewContest {
                title: title.to_string(),
                description: format!("{title} description"),
                window: ContestWindow::new(start, start + Duration::days(1)),
                is_active: true,
                prizes: Prizes::default(),
                requires_proctoring,
            })
            .await
            .expect("contest should be created")
    }

    pub async fn problem(
        &self,
        contest: Option<&ContestRecord>,
        title: &str,
        points: u32,
        tests: &[(&str, &str)],
    ) -> ProblemRecord {
        let mut new_problem = NewProblem::new(
            title,
            Difficulty::Easy,
            Score::new(points).expect("valid points"),
        );
        new_problem.contest_id = contest.map(|c| c.id);
        new_problem.test_cases = tests
            .iter()
            .map(|(input, output)| TestCase {
                input: input.to_string(),
                output: output.to_string(),
            })
            .collect();
        self.save_problem(new_problem).await
    }

    pub async fn premium_problem(
        &self,
        title: &str,
        difficulty: Difficulty,
        company: &str,
        tests: &[(&str, &str)],
    ) -> ProblemRecord {
        let mut new_problem =
            NewProblem::new(title, difficulty, Score::new(100).expect("valid points"));
        new_problem.is_premium = true;
        new_problem.company_tag = company.to_string();
        new_problem.test_cases = tests
            .iter()
            .map(|(input, output)| TestCase {
                input: input.to_string(),
                output: output.to_string(),
            })
            .collect();
        self.save_problem(new_problem).await
    }

    async fn save_problem(&self, new_problem: NewProblem) -> ProblemRecord {
        self.runner.learn(&new_problem.test_cases);
        self.state
            .problems
            .create(new_problem)
            .await
            .expect("problem should be created")
    }

    pub async fn plan(&self, tier: PlanTier, price_inr: i64) -> PlanRecord {
        self.state
            .subscriptions
            .create_plan(NewPlan {
                tier,
                display_name: tier.display_name().to_string(),
                description: String::new(),
                price_inr,
                duration_days: 30,
            })
            .await
            .expect("plan should be created")
    }

    pub async fn get(&self, uri: &str, user: Option<&UserRecord>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, user, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        user: Option<&UserRecord>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, user, Some(body)).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&UserRecord>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };

        (status, value)
    }
}
