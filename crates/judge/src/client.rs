//! HackerEarth v4 代码评测接口的 HTTP 客户端。

use std::time::Duration;

use reqwest::Client;

use crate::Result;
use crate::config::JudgeConfig;
use crate::protocol::{EvaluationRequest, HEADER_CLIENT_SECRET, StatusResponse, SubmitResponse};

#[derive(Debug, Clone)]
pub struct JudgeClient {
    config: JudgeConfig,
    client: Client,
}

impl JudgeClient {
    pub fn new(config: JudgeConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    /// 提交代码，返回带 `he_id` 的排队结果。
    pub async fn submit(&self, request: &EvaluationRequest) -> Result<SubmitResponse> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(HEADER_CLIENT_SECRET, &self.config.client_secret)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// 查询一次执行状态。
    pub async fn status(&self, he_id: &str) -> Result<StatusResponse> {
        let response = self
            .client
            .get(self.config.status_url(he_id))
            .header(HEADER_CLIENT_SECRET, &self.config.client_secret)
            .timeout(Duration::from_secs(self.config.status_timeout_secs))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// 下载评测结果中以 URL 形式给出的输出。
    pub async fn fetch_output(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.status_timeout_secs))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?.trim().to_string())
    }

    /// 输出字段可能是正文，也可能是需要下载的 URL。
    pub async fn resolve_output(&self, raw: &str) -> Result<String> {
        if raw.starts_with("http") {
            self.fetch_output(raw).await
        } else {
            Ok(raw.to_string())
        }
    }
}
