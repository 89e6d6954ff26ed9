// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use actorrs::domain::services::extraction_client::{
    ExtractionClient, ExtractionError, SYSTEM_PROMPT,
};
use actorrs::domain::services::extraction_service::ExtractionService;
use actorrs::utils::retry_policy::RetryPolicy;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{
    completion, mock_completion, mock_status, test_client, test_config, tom_cruise,
    COMPLETIONS_PATH, TEST_API_KEY,
};

/// 正常响应测试
///
/// 验证补全内容被解析为七个字段，并保留完整响应
#[tokio::test]
async fn extracts_fields_from_completion() {
    let upstream = MockServer::start().await;
    mock_completion(&upstream, &tom_cruise().to_string(), 1).await;

    let client = test_client(test_config(&upstream));
    let service = ExtractionService::new(Arc::new(client));

    let record = service
        .extract("Tom Cruise lives at 123 Hollywood Blvd, Los Angeles, CA")
        .await
        .unwrap();

    assert_eq!(record.first_name.as_deref(), Some("Tom"));
    assert_eq!(record.last_name.as_deref(), Some("Cruise"));
    assert_eq!(
        record.address.as_deref(),
        Some("123 Hollywood Blvd, Los Angeles, CA")
    );
    assert_eq!(record.height.as_deref(), Some("5ft 7in"));
    assert_eq!(record.weight.as_deref(), Some("170lbs"));
    assert_eq!(record.gender.as_deref(), Some("male"));
    assert_eq!(record.age, Some(62));
    assert_eq!(record.raw_ai_response["id"], "chatcmpl-test");
    assert!(service.validate_required_fields(&record));
}

/// 请求格式测试
///
/// 验证携带 Bearer 凭据、固定温度、JSON 输出模式以及两条消息
#[tokio::test]
async fn sends_expected_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(1)
        .mount(&upstream)
        .await;

    let client = test_client(test_config(&upstream));
    client.complete("Jane Doe, 1 Main St").await.unwrap();

    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0);
    assert_eq!(body["response_format"], json!({"type": "json_object"}));
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Jane Doe, 1 Main St");
}

/// 服务端错误重试测试
///
/// 500 会被重试，三次尝试后返回传输错误
#[tokio::test]
async fn retries_server_errors_then_fails() {
    let upstream = MockServer::start().await;
    mock_status(&upstream, 500, 3).await;

    let client = test_client(test_config(&upstream));
    let err = client.complete("John Doe lives at 123 Main St").await.unwrap_err();

    assert!(matches!(err, ExtractionError::Transport(_)));
    assert_eq!(
        err.to_string(),
        "Failed to extract actor information. Please try again."
    );
}

/// 重试后成功测试
#[tokio::test]
async fn recovers_after_transient_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&upstream)
        .await;
    mock_completion(&upstream, &tom_cruise().to_string(), 1).await;

    let client = test_client(test_config(&upstream));
    let output = client.complete("Tom Cruise, Hollywood").await.unwrap();

    assert!(output.content.contains("Cruise"));
}

/// 客户端错误不重试
#[tokio::test]
async fn does_not_retry_client_errors() {
    let upstream = MockServer::start().await;
    mock_status(&upstream, 400, 1).await;

    let client = test_client(test_config(&upstream));
    let err = client.complete("John Doe lives at 123 Main St").await.unwrap_err();

    assert!(matches!(err, ExtractionError::Transport(_)));
    assert!(err.detail().contains("400"));
}

/// 超时测试
#[tokio::test]
async fn times_out_slow_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{}"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&upstream)
        .await;

    let mut config = test_config(&upstream);
    config.timeout = Duration::from_millis(200);
    config.retry = RetryPolicy::none();

    let client = test_client(config);
    let err = client.complete("John Doe lives at 123 Main St").await.unwrap_err();

    assert!(matches!(err, ExtractionError::Transport(_)));
}

/// 内容无法解码测试
#[tokio::test]
async fn reports_undecodable_content() {
    let upstream = MockServer::start().await;
    mock_completion(&upstream, "invalid json response", 1).await;

    let client = test_client(test_config(&upstream));
    let service = ExtractionService::new(Arc::new(client));
    let err = service
        .extract("John Doe lives at 123 Main St")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::Format(_)));
    assert_eq!(
        err.to_string(),
        "Failed to process actor information. Please try again."
    );
}

/// 响应体不是 JSON
#[tokio::test]
async fn reports_non_json_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(1)
        .mount(&upstream)
        .await;

    let client = test_client(test_config(&upstream));
    let err = client.complete("John Doe lives at 123 Main St").await.unwrap_err();

    assert!(matches!(err, ExtractionError::Format(_)));
}

/// 缺少身份字段的提取结果
#[tokio::test]
async fn incomplete_extraction_fails_gate() {
    let upstream = MockServer::start().await;
    let content = json!({
        "first_name": "John",
        "last_name": null,
        "address": "123 Main St",
        "height": null,
        "weight": null,
        "gender": null,
        "age": null
    });
    mock_completion(&upstream, &content.to_string(), 1).await;

    let service = ExtractionService::new(Arc::new(test_client(test_config(&upstream))));
    let record = service.extract("John lives at 123 Main St").await.unwrap();

    assert_eq!(record.last_name, None);
    assert!(!service.validate_required_fields(&record));
}
