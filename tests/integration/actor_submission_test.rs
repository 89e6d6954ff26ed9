// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use actorrs::application::dto::actor_request::{
    SubmitActorRequestDto, DESCRIPTION_REQUIRED, DESCRIPTION_TAKEN, DESCRIPTION_TOO_SHORT,
    EMAIL_INVALID, EMAIL_REQUIRED, EMAIL_TAKEN,
};
use actorrs::application::usecases::submit_actor::{SubmissionError, SubmitActorUseCase};
use actorrs::domain::models::submission::{NewSubmission, Page, Submission, SubmissionSummary};
use actorrs::domain::repositories::submission_repository::{
    RepositoryError, SubmissionRepository,
};
use actorrs::domain::services::extraction_service::ExtractionService;
use actorrs::infrastructure::repositories::submission_repo_impl::SubmissionRepositoryImpl;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

use super::helpers::{
    create_test_app, create_test_db, fake_submission, mock_completion, mock_status, test_client,
    test_config, tom_cruise,
};

const TOM_DESCRIPTION: &str = "Tom Cruise lives at 123 Hollywood Blvd, Los Angeles, CA";

/// 成功提交测试
///
/// 提取结果完整时写入一条记录，并以 303 重定向到列表页
#[tokio::test]
async fn successful_submission_creates_actor() {
    let app = create_test_app().await;
    mock_completion(&app.upstream, &tom_cruise().to_string(), 1).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "test@example.com"), ("description", TOM_DESCRIPTION)])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/actors");
    let body: Value = response.json();
    assert_eq!(body["message"], "Actor information submitted successfully!");
    assert_eq!(body["redirect"], "/actors");

    assert_eq!(app.repo.count().await.unwrap(), 1);
    assert!(app.repo.exists_by_email("test@example.com").await.unwrap());
    assert!(app.repo.exists_by_description(TOM_DESCRIPTION).await.unwrap());

    let page = app.repo.list(1, 15).await.unwrap();
    assert_eq!(page.data[0].first_name, "Tom");
    assert_eq!(page.data[0].address, "123 Hollywood Blvd, Los Angeles, CA");
    assert_eq!(page.data[0].gender.as_deref(), Some("male"));
    assert_eq!(page.data[0].height.as_deref(), Some("5ft 7in"));
}

/// 必填字段测试
#[tokio::test]
async fn requires_email_and_description() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;

    let response = app.server.post("/actors").form(&[("email", "")]).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"], json!([EMAIL_REQUIRED]));
    assert_eq!(body["errors"]["description"], json!([DESCRIPTION_REQUIRED]));
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

/// 只缺一个字段时只报告该字段
#[tokio::test]
async fn reports_only_the_missing_field() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "test@example.com")])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"], json!({"description": [DESCRIPTION_REQUIRED]}));
    assert_eq!(body["old"]["email"], "test@example.com");

    let response = app
        .server
        .post("/actors")
        .form(&[("description", "John Doe lives at 123 Main St")])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"], json!({"email": [EMAIL_REQUIRED]}));
}

/// 邮箱格式测试
#[tokio::test]
async fn rejects_invalid_email() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;

    let response = app
        .server
        .post("/actors")
        .form(&[
            ("email", "invalid-email"),
            ("description", "John Doe lives at 123 Main St"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"], json!([EMAIL_INVALID]));
    assert!(body["errors"].get("description").is_none());
}

/// 描述长度测试
#[tokio::test]
async fn rejects_short_description() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "test@example.com"), ("description", "short")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["description"], json!([DESCRIPTION_TOO_SHORT]));
    assert_eq!(body["message"], DESCRIPTION_TOO_SHORT);
}

/// 重复邮箱测试
///
/// 邮箱已存在时不调用上游
#[tokio::test]
async fn rejects_duplicate_email_without_calling_upstream() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;
    app.repo.create(fake_submission(1)).await.unwrap();

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "actor1@example.com"), ("description", TOM_DESCRIPTION)])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"], json!([EMAIL_TAKEN]));
    assert!(body["errors"].get("description").is_none());
    assert_eq!(app.repo.count().await.unwrap(), 1);
}

/// 重复描述测试
#[tokio::test]
async fn rejects_duplicate_description_without_calling_upstream() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 200, 0).await;
    let existing = fake_submission(2);
    let description = existing.description.clone();
    app.repo.create(existing).await.unwrap();

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "someone.else@example.com"), ("description", description.as_str())])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["description"], json!([DESCRIPTION_TAKEN]));
    assert_eq!(app.repo.count().await.unwrap(), 1);
}

/// 重复提交测试
///
/// 同一份输入提交两次只产生一条记录，第二次报告唯一性冲突
#[tokio::test]
async fn identical_resubmission_is_rejected() {
    let app = create_test_app().await;
    mock_completion(&app.upstream, &tom_cruise().to_string(), 1).await;
    let form = [("email", "test@example.com"), ("description", TOM_DESCRIPTION)];

    let first = app.server.post("/actors").form(&form).await;
    assert_eq!(first.status_code(), StatusCode::SEE_OTHER);

    let second = app.server.post("/actors").form(&form).await;
    assert_eq!(second.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = second.json();
    assert_eq!(body["errors"]["email"], json!([EMAIL_TAKEN]));
    assert_eq!(body["errors"]["description"], json!([DESCRIPTION_TAKEN]));

    assert_eq!(app.repo.count().await.unwrap(), 1);
}

/// 缺少身份字段测试
///
/// 提取结果缺少姓氏时返回 "Data not found" 且不写入
#[tokio::test]
async fn missing_identity_fields_returns_data_not_found() {
    let app = create_test_app().await;
    let content = json!({
        "first_name": "John",
        "last_name": null,
        "address": "123 Main St",
        "height": null,
        "weight": null,
        "gender": null,
        "age": null
    });
    mock_completion(&app.upstream, &content.to_string(), 1).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "john@example.com"), ("description", "John lives at 123 Main St")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["errors"]["description"], json!(["Data not found"]));
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

/// 上游失败测试
///
/// 重试耗尽后在描述字段上报告错误，原始输入被带回
#[tokio::test]
async fn upstream_failure_preserves_old_input() {
    let app = create_test_app().await;
    mock_status(&app.upstream, 500, 3).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "test@example.com"), ("description", "John Doe lives at 123 Main St")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(
        body["errors"]["description"],
        json!(["Failed to extract actor information. Please try again."])
    );
    assert_eq!(body["old"]["email"], "test@example.com");
    assert_eq!(body["old"]["description"], "John Doe lives at 123 Main St");
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

/// 上游内容无法解码测试
#[tokio::test]
async fn undecodable_content_reports_processing_error() {
    let app = create_test_app().await;
    mock_completion(&app.upstream, "invalid json response", 1).await;

    let response = app
        .server
        .post("/actors")
        .form(&[("email", "test@example.com"), ("description", "John Doe lives at 123 Main St")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(
        body["errors"]["description"],
        json!(["Failed to process actor information. Please try again."])
    );
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

/// 预检查始终放行的仓库，用于模拟并发提交的竞态
struct RacingRepository(SubmissionRepositoryImpl);

#[async_trait]
impl SubmissionRepository for RacingRepository {
    async fn create(&self, submission: NewSubmission) -> Result<Submission, RepositoryError> {
        self.0.create(submission).await
    }

    async fn exists_by_email(&self, _email: &str) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn exists_by_description(&self, _description: &str) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<SubmissionSummary>, RepositoryError> {
        self.0.list(page, per_page).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.0.count().await
    }
}

/// 写入时的唯一约束冲突同样映射为字段错误
#[tokio::test]
async fn insert_time_conflict_maps_to_field_error() {
    let upstream = MockServer::start().await;
    mock_completion(&upstream, &tom_cruise().to_string(), 1).await;

    let db = create_test_db().await;
    let inner = SubmissionRepositoryImpl::new(db);
    let mut existing = fake_submission(3);
    existing.email = "test@example.com".to_string();
    inner.create(existing).await.unwrap();

    let extraction = Arc::new(ExtractionService::new(Arc::new(test_client(test_config(
        &upstream,
    )))));
    let use_case = SubmitActorUseCase::new(Arc::new(RacingRepository(inner.clone())), extraction);

    let err = use_case
        .execute(SubmitActorRequestDto {
            email: Some("test@example.com".to_string()),
            description: Some(TOM_DESCRIPTION.to_string()),
        })
        .await
        .unwrap_err();

    match err {
        SubmissionError::Validation(errors) => {
            assert_eq!(errors.get("email"), Some(&[EMAIL_TAKEN.to_string()][..]));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(inner.count().await.unwrap(), 1);
}
