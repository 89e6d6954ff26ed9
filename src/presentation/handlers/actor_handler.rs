// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::dto::actor_request::{FieldErrors, SubmitActorRequestDto};
use crate::application::usecases::submit_actor::{
    SubmissionError, SubmitActorUseCase, DATA_NOT_FOUND,
};
use crate::domain::models::submission::{normalize_page, Page, SubmissionSummary, PAGE_SIZE};
use crate::domain::repositories::submission_repository::SubmissionRepository;
use crate::presentation::errors::{AppError, FormErrorResponse};

/// 列表页路径，提交成功后重定向到这里
pub const ACTORS_INDEX: &str = "/actors";

pub const SUCCESS_MESSAGE: &str = "Actor information submitted successfully!";

/// 提交成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitActorResponse {
    pub message: String,
    pub redirect: String,
}

/// 列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ListActorsResponse {
    pub actors: Page<SubmissionSummary>,
}

/// 列表查询参数
///
/// 页码保留为字符串，无法解析时回退到第一页
#[derive(Debug, Default, Deserialize)]
pub struct ListActorsQuery {
    pub page: Option<String>,
}

/// 处理演员信息提交
///
/// 成功时 303 重定向到列表页；失败时返回 422 与字段错误，并带回原始输入
pub async fn store<R: SubmissionRepository + 'static>(
    Extension(use_case): Extension<Arc<SubmitActorUseCase<R>>>,
    Form(payload): Form<SubmitActorRequestDto>,
) -> Response {
    let old = payload.clone();

    match use_case.execute(payload).await {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, ACTORS_INDEX)],
            Json(SubmitActorResponse {
                message: SUCCESS_MESSAGE.to_string(),
                redirect: ACTORS_INDEX.to_string(),
            }),
        )
            .into_response(),
        Err(SubmissionError::Validation(errors)) => {
            FormErrorResponse::new(errors, old).into_response()
        }
        Err(SubmissionError::Extraction(e)) => {
            FormErrorResponse::new(FieldErrors::single("description", e.to_string()), old)
                .into_response()
        }
        Err(SubmissionError::DataNotFound) => {
            FormErrorResponse::new(FieldErrors::single("description", DATA_NOT_FOUND), old)
                .into_response()
        }
        Err(SubmissionError::Repository(e)) => AppError::from(e).into_response(),
    }
}

/// 分页列出已提交的演员信息
pub async fn index<R: SubmissionRepository + 'static>(
    Extension(repository): Extension<Arc<R>>,
    Query(query): Query<ListActorsQuery>,
) -> Result<Json<ListActorsResponse>, AppError> {
    let page = normalize_page(query.page.as_deref());
    let actors = repository.list(page, PAGE_SIZE).await?;

    Ok(Json(ListActorsResponse { actors }))
}
