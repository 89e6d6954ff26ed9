// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::domain::models::submission::ExtractedRecord;
use crate::domain::services::extraction_client::{ExtractionClient, ExtractionError};
use crate::domain::services::{extraction_parser, field_gate};

/// 提示信息
pub const PROMPT_TEXT: &str = "Please enter first name and last name, and also provide address.";

/// 提取服务
///
/// 串联提取客户端与解析器，把一段演员描述转换为结构化的提取结果
pub struct ExtractionService {
    client: Arc<dyn ExtractionClient>,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn ExtractionClient>) -> Self {
        Self { client }
    }

    /// 提取演员信息
    ///
    /// # 错误
    /// * `ExtractionError::Transport` - 上游不可达或重试后仍失败
    /// * `ExtractionError::Format` - 上游内容无法解码
    pub async fn extract(&self, description: &str) -> Result<ExtractedRecord, ExtractionError> {
        let started = Instant::now();

        let result = match self.client.complete(description).await {
            Ok(output) => extraction_parser::parse(&output.content, output.full_response),
            Err(e) => Err(e),
        };

        let label = match &result {
            Ok(_) => "success",
            Err(ExtractionError::Transport(_)) => "transport_error",
            Err(ExtractionError::Format(_)) => "format_error",
        };
        metrics::counter!("extraction_requests_total", "result" => label).increment(1);
        metrics::histogram!("extraction_duration_seconds").record(started.elapsed().as_secs_f64());

        result
    }

    /// 检查身份字段是否齐全
    pub fn validate_required_fields(&self, record: &ExtractedRecord) -> bool {
        let complete = field_gate::is_complete(record);
        debug!(
            first_name = ?record.first_name,
            last_name = ?record.last_name,
            address = ?record.address,
            complete,
            "Checked required fields"
        );
        complete
    }

    pub fn prompt_text() -> &'static str {
        PROMPT_TEXT
    }
}
