// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::application::dto::actor_request::{FieldErrors, SubmitActorRequestDto};
use crate::domain::repositories::submission_repository::RepositoryError;

/// 应用错误类型
///
/// 封装未预期的应用层错误，统一输出 `{"error": ...}`
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::Database(_db_err)) => StatusCode::INTERNAL_SERVER_ERROR,
            Some(RepositoryError::Duplicate(_field)) => StatusCode::CONFLICT,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %error_message, "Request failed");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// 表单校验失败响应
///
/// 返回 422，携带按字段分组的错误以及原始输入，便于重新填写
#[derive(Debug, Serialize)]
pub struct FormErrorResponse {
    pub message: String,
    pub errors: FieldErrors,
    pub old: SubmitActorRequestDto,
}

impl FormErrorResponse {
    pub fn new(errors: FieldErrors, old: SubmitActorRequestDto) -> Self {
        let message = errors
            .first_message()
            .unwrap_or("The given data was invalid.")
            .to_string();
        Self {
            message,
            errors,
            old,
        }
    }
}

impl IntoResponse for FormErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}
