// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::application::dto::actor_request::{unique_message, FieldErrors, SubmitActorRequestDto};
use crate::domain::models::submission::{NewSubmission, Submission};
use crate::domain::repositories::submission_repository::{
    RepositoryError, SubmissionRepository, UniqueField,
};
use crate::domain::services::extraction_client::ExtractionError;
use crate::domain::services::extraction_service::ExtractionService;

/// 身份字段缺失时的提示
pub const DATA_NOT_FOUND: &str = "Data not found";

/// 提交流程错误
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// 输入格式错误或唯一性冲突
    #[error("The given data was invalid.")]
    Validation(FieldErrors),
    /// 上游提取失败
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// 提取结果缺少身份字段
    #[error("Data not found")]
    DataNotFound,
    /// 其他数据库错误
    #[error(transparent)]
    Repository(RepositoryError),
}

impl SubmissionError {
    fn outcome(&self) -> &'static str {
        match self {
            SubmissionError::Validation(_) => "validation_failed",
            SubmissionError::Extraction(_) => "extraction_failed",
            SubmissionError::DataNotFound => "data_not_found",
            SubmissionError::Repository(_) => "error",
        }
    }
}

impl From<RepositoryError> for SubmissionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(field) => SubmissionError::Validation(
                FieldErrors::single(field.field_name(), unique_message(field)),
            ),
            other => SubmissionError::Repository(other),
        }
    }
}

// === Section: Use Case Definition ===

/// 演员提交用例
///
/// 校验输入 → 调用提取 → 校验身份字段 → 写入。任何一步失败都不会留下记录。
pub struct SubmitActorUseCase<R: SubmissionRepository> {
    repository: Arc<R>,
    extraction: Arc<ExtractionService>,
}

// === Section: Implementation ===

impl<R: SubmissionRepository> SubmitActorUseCase<R> {
    pub fn new(repository: Arc<R>, extraction: Arc<ExtractionService>) -> Self {
        Self {
            repository,
            extraction,
        }
    }

    pub async fn execute(
        &self,
        request_dto: SubmitActorRequestDto,
    ) -> Result<Submission, SubmissionError> {
        let result = self.run(request_dto).await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(e) => e.outcome(),
        };
        metrics::counter!("actor_submissions_total", "outcome" => outcome).increment(1);

        result
    }

    async fn run(&self, request_dto: SubmitActorRequestDto) -> Result<Submission, SubmissionError> {
        let (email, description) = self.validate(request_dto).await?;

        let record = self.extraction.extract(&description).await?;

        if !self.extraction.validate_required_fields(&record) {
            warn!(description = %description, "Extraction is missing identity fields");
            return Err(SubmissionError::DataNotFound);
        }

        let submission = NewSubmission::from_extraction(email, description, record)
            .ok_or(SubmissionError::DataNotFound)?;

        let created = self.repository.create(submission).await?;
        info!(id = created.id, first_name = %created.first_name, "Actor submission created");

        Ok(created)
    }

    /// 格式校验通过的字段再检查唯一性，避免对无效输入查库
    ///
    /// 成功时返回去除空白后的邮箱和描述
    async fn validate(
        &self,
        request_dto: SubmitActorRequestDto,
    ) -> Result<(String, String), SubmissionError> {
        let input = request_dto.normalized();
        let mut errors = match input.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if let Some(email) = input.email.as_deref() {
            if !errors.has(UniqueField::Email.field_name())
                && self.repository.exists_by_email(email).await?
            {
                errors.add(
                    UniqueField::Email.field_name(),
                    unique_message(UniqueField::Email),
                );
            }
        }

        if let Some(description) = input.description.as_deref() {
            if !errors.has(UniqueField::Description.field_name())
                && self.repository.exists_by_description(description).await?
            {
                errors.add(
                    UniqueField::Description.field_name(),
                    unique_message(UniqueField::Description),
                );
            }
        }

        match (input.email, input.description) {
            (Some(email), Some(description)) if errors.is_empty() => Ok((email, description)),
            _ => Err(SubmissionError::Validation(errors)),
        }
    }
}
