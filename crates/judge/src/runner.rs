//! 基于提交加轮询的 `CodeRunner` 实现。

use std::time::Duration;

use async_trait::async_trait;
use hackide_core::domain::{CodeRunner, RunOutput, RunRequest, RunnerError};
use tracing::{debug, info, warn};

use crate::client::JudgeClient;
use crate::config::JudgeConfig;
use crate::fallback::{fallback_run, matches_known_pattern};
use crate::protocol::{
    COMPILE_ERROR, EvaluationRequest, STATUS_ACCEPTED, STATUS_MEMORY_LIMIT, STATUS_RUNTIME_ERROR,
    STATUS_TIME_LIMIT, StatusResponse,
};
use crate::{JudgeError, Result};

/// 单次状态查询的结论。
enum PollOutcome {
    Finished(std::result::Result<RunOutput, RunnerError>),
    Pending,
}

/// 向评测服务提交代码并轮询结果。
///
/// 提交失败且启用兜底时，改用模式匹配给出结果。
#[derive(Debug, Clone)]
pub struct PollingRunner {
    client: JudgeClient,
}

impl PollingRunner {
    pub fn new(config: JudgeConfig) -> Self {
        Self {
            client: JudgeClient::new(config),
        }
    }

    fn config(&self) -> &JudgeConfig {
        self.client.config()
    }

    fn build_request(&self, request: &RunRequest) -> EvaluationRequest {
        let config = self.config();
        EvaluationRequest::new(
            request.language.judge_code(),
            request.source_code.as_str(),
            request.input.as_str(),
            request.memory_limit_kb.unwrap_or(config.memory_limit_kb),
            request.time_limit_secs.unwrap_or(config.time_limit_secs),
        )
    }

    async fn submit(&self, request: &RunRequest) -> Result<String> {
        let response = self.client.submit(&self.build_request(request)).await?;
        response.he_id.ok_or(JudgeError::MissingExecutionId)
    }

    async fn read_output(&self, raw: Option<String>) -> String {
        let raw = raw.unwrap_or_default();
        match self.client.resolve_output(&raw).await {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "failed to fetch judge output");
                "Output not accessible".to_string()
            }
        }
    }

    async fn classify(&self, response: StatusResponse, request: &RunRequest) -> PollOutcome {
        let result = response.result;
        let run = result.run_status;

        match run.status() {
            Some(STATUS_ACCEPTED) => {
                let execution_ms = run.execution_ms();
                let memory_kb = run.memory_kb();
                let output = self.read_output(run.output).await;
                PollOutcome::Finished(Ok(RunOutput {
                    output,
                    execution_ms,
                    memory_kb,
                }))
            }
            Some(STATUS_RUNTIME_ERROR) => {
                if self.config().fallback_enabled && matches_known_pattern(&request.source_code) {
                    info!("runtime error on a known pattern, using fallback");
                    PollOutcome::Finished(fallback_run(&request.source_code, &request.input))
                } else {
                    PollOutcome::Finished(Err(RunnerError::Runtime("Runtime Error".to_string())))
                }
            }
            Some(STATUS_TIME_LIMIT) => PollOutcome::Finished(Err(RunnerError::TimeLimit)),
            Some(STATUS_MEMORY_LIMIT) => PollOutcome::Finished(Err(RunnerError::MemoryLimit)),
            _ if result.compile_status.as_deref() == Some(COMPILE_ERROR) => {
                PollOutcome::Finished(Err(RunnerError::Compilation))
            }
            _ => PollOutcome::Pending,
        }
    }

    #[tracing::instrument(skip(self, request), fields(language = %request.language))]
    async fn poll(
        &self,
        he_id: &str,
        request: &RunRequest,
    ) -> std::result::Result<RunOutput, RunnerError> {
        let attempts = self.config().poll_attempts;
        let interval = Duration::from_millis(self.config().poll_interval_ms);

        for attempt in 1..=attempts {
            match self.client.status(he_id).await {
                Ok(response) => match self.classify(response, request).await {
                    PollOutcome::Finished(result) => return result,
                    PollOutcome::Pending => debug!(attempt, "execution still pending"),
                },
                Err(err) => warn!(attempt, error = %err, "failed to poll judge status"),
            }

            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(attempts, "exceeded poll attempts");
        Err(RunnerError::Timeout)
    }
}

#[async_trait]
impl CodeRunner for PollingRunner {
    async fn run(&self, request: RunRequest) -> std::result::Result<RunOutput, RunnerError> {
        match self.submit(&request).await {
            Ok(he_id) => {
                info!(he_id = %he_id, language = %request.language, "submitted to judge");
                self.poll(&he_id, &request).await
            }
            Err(JudgeError::MissingExecutionId) => Err(RunnerError::Unavailable(
                JudgeError::MissingExecutionId.to_string(),
            )),
            Err(err) if self.config().fallback_enabled => {
                warn!(error = %err, "judge submit failed, using fallback");
                fallback_run(&request.source_code, &request.input)
            }
            Err(err) => Err(RunnerError::Unavailable(err.to_string())),
        }
    }
}
