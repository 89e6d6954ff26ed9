// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use actorrs::config::settings::Settings;
use actorrs::domain::services::extraction_client::{ExtractionConfig, OpenAiExtractionClient};
use actorrs::domain::services::extraction_service::ExtractionService;
use actorrs::infrastructure::database::connection;
use actorrs::presentation::routes;
use actorrs::utils::telemetry;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting actorrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    actorrs::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize extraction pipeline
    let extraction_config = ExtractionConfig::from(&settings.extraction);
    if extraction_config.api_key.is_none() {
        warn!("Extraction API key not configured; submissions will fail until it is set");
    }
    info!(
        model = %extraction_config.model,
        timeout_secs = extraction_config.timeout.as_secs(),
        max_retries = extraction_config.retry.max_retries,
        "Extraction client configured"
    );
    let client = OpenAiExtractionClient::new(extraction_config)?;
    let extraction = Arc::new(ExtractionService::new(Arc::new(client)));

    // 5. Start HTTP server
    let app = routes::app(db.clone(), extraction);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
