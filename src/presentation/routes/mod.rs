// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::submit_actor::SubmitActorUseCase;
use crate::domain::services::extraction_service::ExtractionService;
use crate::infrastructure::repositories::submission_repo_impl::SubmissionRepositoryImpl;
use crate::presentation::handlers::{actor_handler, prompt_handler};
use axum::{routing::get, Extension, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 依赖以 `Extension` 形式注入，参见 [`app`]
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route(
            "/api/actors/prompt-validation",
            get(prompt_handler::prompt_validation),
        );

    let actor_routes = Router::new().route(
        "/actors",
        get(actor_handler::index::<SubmissionRepositoryImpl>)
            .post(actor_handler::store::<SubmissionRepositoryImpl>),
    );

    Router::new().merge(public_routes).merge(actor_routes)
}

/// 组装完整应用
///
/// # 参数
///
/// * `db` - 数据库连接
/// * `extraction` - 提取服务
pub fn app(db: Arc<DatabaseConnection>, extraction: Arc<ExtractionService>) -> Router {
    let repository = Arc::new(SubmissionRepositoryImpl::new(db));
    let use_case = Arc::new(SubmitActorUseCase::new(repository.clone(), extraction));

    routes()
        .layer(Extension(repository))
        .layer(Extension(use_case))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
