//! 在线 IDE：编译、运行代码与查询执行状态。

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use hackide_api_types::{
    CompileCodeResponse, ExecutionStatusResponse, RunCodeRequest, RunCodeResponse,
};
use hackide_core::domain::{Language, RunOutput, RunRequest, RunnerError};
use hackide_judge::JudgeError;
use hackide_judge::protocol::{
    COMPILE_ERROR, EvaluationRequest, STATUS_ACCEPTED, STATUS_MEMORY_LIMIT, STATUS_RUNTIME_ERROR,
    STATUS_TIME_LIMIT,
};
use tracing::{info, warn};

use super::auth::CurrentUser;
use super::error::ApiError;
use super::state::AppState;

const COMPILE_OK: &str = "OK";
const NOT_RUN: &str = "NA";
const UNKNOWN: &str = "Unknown";
const PROCESSING: &str = "Processing";
const DEVELOPMENT_MODE_MESSAGE: &str =
    "Code evaluation service unavailable - using development mode";

fn judge_unavailable(err: JudgeError) -> ApiError {
    ApiError::new(
        StatusCode::BAD_GATEWAY,
        "JUDGE_UNAVAILABLE",
        format!("Code evaluation service unavailable: {err}"),
    )
}

/// 空源码优先于语言校验。
fn validate(request: &RunCodeRequest) -> Result<Language, ApiError> {
    if request.source.is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_SOURCE",
            "Source can't be empty!",
        ));
    }
    Ok(Language::from_str(&request.language)?)
}

fn run_response(result: Result<RunOutput, RunnerError>) -> Result<RunCodeResponse, ApiError> {
    let (compile_status, run_status, err) = match result {
        Ok(output) => {
            return Ok(RunCodeResponse {
                compile_status: COMPILE_OK.to_string(),
                run_status: STATUS_ACCEPTED.to_string(),
                output: output.output,
                time_used_ms: output.execution_ms,
                memory_kb: output.memory_kb,
                message: None,
                stderr: None,
            });
        }
        Err(RunnerError::Unavailable(reason)) => {
            return Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                "JUDGE_UNAVAILABLE",
                format!("Code evaluation service unavailable: {reason}"),
            ));
        }
        Err(err @ RunnerError::Timeout) => {
            return Err(ApiError::new(
                StatusCode::GATEWAY_TIMEOUT,
                "JUDGE_TIMEOUT",
                err.to_string(),
            ));
        }
        Err(err @ RunnerError::Compilation) => (COMPILE_ERROR, NOT_RUN, err),
        Err(err @ RunnerError::TimeLimit) => (COMPILE_OK, STATUS_TIME_LIMIT, err),
        Err(err @ RunnerError::MemoryLimit) => (COMPILE_OK, STATUS_MEMORY_LIMIT, err),
        Err(err @ RunnerError::Runtime(_)) => (COMPILE_OK, STATUS_RUNTIME_ERROR, err),
    };

    let stderr = match &err {
        RunnerError::Runtime(detail) => Some(detail.clone()),
        _ => None,
    };

    Ok(RunCodeResponse {
        compile_status: compile_status.to_string(),
        run_status: run_status.to_string(),
        output: String::new(),
        time_used_ms: 0,
        memory_kb: 0,
        message: Some(err.to_string()),
        stderr,
    })
}

/// 编译并运行一次代码。
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RunCodeRequest>,
) -> Result<Json<RunCodeResponse>, ApiError> {
    let language = validate(&request)?;

    info!(user_id = %user.id, language = %language, "running code");
    let result = state
        .runner
        .run(RunRequest::new(language, request.source, request.input))
        .await;
    if let Err(err) = &result {
        warn!(user_id = %user.id, error = %err, "code run did not succeed");
    }

    run_response(result).map(Json)
}

/// 只编译代码，返回评测服务的排队结果。
pub async fn compile_code(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RunCodeRequest>,
) -> Result<Json<CompileCodeResponse>, ApiError> {
    let language = validate(&request)?;
    let config = state.judge.config();
    let evaluation = EvaluationRequest::compile_only(
        language.judge_code(),
        request.source,
        config.memory_limit_kb,
        config.time_limit_secs,
    );

    info!(user_id = %user.id, language = %language, "compiling code");
    match state.judge.submit(&evaluation).await {
        Ok(response) => Ok(Json(CompileCodeResponse {
            compile_status: response
                .result
                .compile_status
                .unwrap_or_else(|| UNKNOWN.to_string()),
            he_id: response.he_id,
            message: None,
        })),
        Err(err) if config.fallback_enabled => {
            warn!(
                user_id = %user.id,
                error = %err,
                "compile request failed, using development mode"
            );
            Ok(Json(CompileCodeResponse {
                compile_status: COMPILE_OK.to_string(),
                he_id: None,
                message: Some(DEVELOPMENT_MODE_MESSAGE.to_string()),
            }))
        }
        Err(err) => {
            warn!(user_id = %user.id, error = %err, "compile request failed");
            Err(judge_unavailable(err))
        }
    }
}

fn valid_execution_id(he_id: &str) -> bool {
    !he_id.is_empty()
        && he_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 查询一次执行的最新状态，输出为 URL 时会下载正文。
pub async fn execution_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(he_id): Path<String>,
) -> Result<Json<ExecutionStatusResponse>, ApiError> {
    if !valid_execution_id(&he_id) {
        return Err(ApiError::bad_request(
            "INVALID_EXECUTION_ID",
            "Execution id may only contain letters, digits, '-' and '_'",
        ));
    }

    let response = state.judge.status(&he_id).await.map_err(|err| {
        warn!(he_id = %he_id, error = %err, "status request failed");
        judge_unavailable(err)
    })?;
    let run = response.result.run_status;

    let output = match run.output.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => match state.judge.resolve_output(raw).await {
            Ok(output) => output,
            Err(err) => format!("Error retrieving output: {err}"),
        },
        None if run.status() == Some(STATUS_ACCEPTED) => "No output available".to_string(),
        None => "Processing...".to_string(),
    };

    Ok(Json(ExecutionStatusResponse {
        compile_status: response
            .result
            .compile_status
            .unwrap_or_else(|| UNKNOWN.to_string()),
        run_status: run.status().unwrap_or(PROCESSING).to_string(),
        time_used_ms: run.execution_ms(),
        memory_kb: run.memory_kb(),
        output,
        stderr: run.stderr.unwrap_or_default(),
        he_id,
    }))
}
