// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::settings::ExtractionSettings;
use crate::utils::retry_policy::{is_retryable_error, is_retryable_status, RetryPolicy};

/// 补全请求中固定的采样温度
pub const TEMPERATURE: u8 = 0;

/// 补全结果必须包含的七个字段
pub const EXTRACTION_FIELDS: [&str; 7] = [
    "first_name",
    "last_name",
    "address",
    "height",
    "weight",
    "gender",
    "age",
];

/// 系统提示词
pub const SYSTEM_PROMPT: &str = "You are an actor information extraction assistant. \
Extract the name and address from the text, then use your knowledge about that actor to provide their physical details.
INSTRUCTIONS:
1. Extract first_name, last_name, and address from the provided text
2. If you recognize the actor, use your knowledge to fill in height, weight, gender, and current age
3. ALWAYS return all 7 fields: first_name, last_name, address, height, weight, gender, age
4. If you don't know specific details, make reasonable estimates based on the actor
5. Return only valid JSON format

CRITICAL: Always include all 7 fields, never omit any field.";

/// 提取错误
///
/// `Display` 只输出面向用户的固定文案，内部细节保存在变体中仅用于日志
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// 上游不可达、超时或重试后仍返回非 2xx
    #[error("Failed to extract actor information. Please try again.")]
    Transport(String),
    /// 上游返回的内容无法解码为 JSON
    #[error("Failed to process actor information. Please try again.")]
    Format(String),
}

impl ExtractionError {
    /// 内部错误细节
    pub fn detail(&self) -> &str {
        match self {
            ExtractionError::Transport(detail) | ExtractionError::Format(detail) => detail,
        }
    }
}

/// 一次补全调用的原始输出
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutput {
    /// `choices[0].message.content`，缺失时为空字符串
    pub content: String,
    /// 完整的上游响应
    pub full_response: Value,
}

/// 提取客户端特质
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// 针对一段自由文本发起补全请求并返回原始内容
    async fn complete(&self, raw_text: &str) -> Result<CompletionOutput, ExtractionError>;
}

/// 提取客户端配置
///
/// 在构造时显式传入，客户端不读取任何全局配置
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// 单次尝试的超时时间
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl From<&ExtractionSettings> for ExtractionConfig {
    fn from(settings: &ExtractionSettings) -> Self {
        Self {
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            retry: RetryPolicy::fixed(
                settings.max_retries,
                Duration::from_millis(settings.retry_delay_ms),
            ),
        }
    }
}

/// 单次尝试失败的原因
enum AttemptFailure {
    Status(StatusCode, String),
    Transport(reqwest::Error),
}

impl AttemptFailure {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptFailure::Status(status, _) => is_retryable_status(*status),
            AttemptFailure::Transport(err) => is_retryable_error(err),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Status(status, body) => {
                write!(f, "completion endpoint returned {}: {}", status, body)
            }
            AttemptFailure::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

/// 基于 OpenAI 兼容补全接口的提取客户端
///
/// # 网络策略
///
/// - 每次尝试受 `timeout` 限制
/// - 瞬时失败（连接错误、超时、408/429/5xx）按固定间隔重试
/// - 重试用尽后的非 2xx 响应视为失败
pub struct OpenAiExtractionClient {
    http: reqwest::Client,
    config: ExtractionConfig,
}

impl OpenAiExtractionClient {
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractionError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// 构造补全请求体
    pub fn request_body(&self, raw_text: &str) -> Value {
        json!({
            "model": self.config.model,
            "temperature": TEMPERATURE,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": raw_text
                }
            ],
            "response_format": {
                "type": "json_object"
            }
        })
    }

    async fn send_once(&self, api_key: &str, body: &Value) -> Result<String, AttemptFailure> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(AttemptFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AttemptFailure::Status(status, error_text));
        }

        response.text().await.map_err(AttemptFailure::Transport)
    }
}

#[async_trait]
impl ExtractionClient for OpenAiExtractionClient {
    async fn complete(&self, raw_text: &str) -> Result<CompletionOutput, ExtractionError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) => key,
            None => {
                error!(description = %raw_text, "Extraction API key not configured");
                return Err(ExtractionError::Transport(
                    "extraction API key not configured".to_string(),
                ));
            }
        };

        let body = self.request_body(raw_text);
        let mut attempt = 1;

        let text = loop {
            match self.send_once(api_key, &body).await {
                Ok(text) => break text,
                Err(failure) if failure.is_retryable() && self.config.retry.should_retry(attempt) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.retry.max_attempts(),
                        error = %failure,
                        "Extraction request failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry.delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    error!(
                        error = %failure,
                        attempt,
                        description = %raw_text,
                        "Extraction API request failed"
                    );
                    return Err(ExtractionError::Transport(failure.to_string()));
                }
            }
        };

        let full_response: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                error!(body = %text, json_error = %e, "Extraction response body is not JSON");
                return Err(ExtractionError::Format(format!(
                    "response body is not JSON: {}",
                    e
                )));
            }
        };

        let content = full_response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        info!(
            full_response = %full_response,
            content = %content,
            "Extraction raw response"
        );

        Ok(CompletionOutput {
            content,
            full_response,
        })
    }
}
