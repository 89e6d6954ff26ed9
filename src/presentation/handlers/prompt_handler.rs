// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::services::extraction_service::ExtractionService;

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub message: String,
}

/// 返回提交表单的提示信息
pub async fn prompt_validation() -> Json<PromptResponse> {
    Json(PromptResponse {
        message: ExtractionService::prompt_text().to_string(),
    })
}
