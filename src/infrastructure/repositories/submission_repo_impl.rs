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

use crate::domain::models::submission::{NewSubmission, Page, Submission, SubmissionSummary};
use crate::domain::repositories::submission_repository::{
    RepositoryError, SubmissionRepository, UniqueField,
};
use crate::infrastructure::database::entities::actor as actor_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::ChronoDateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 提交记录仓库实现
///
/// 基于SeaORM实现，唯一性由 actors 表上的唯一索引保证
#[derive(Clone)]
pub struct SubmissionRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SubmissionRepositoryImpl {
    /// 创建新的提交记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 列表投影对应的查询结果
#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    first_name: String,
    address: String,
    gender: Option<String>,
    height: Option<String>,
    created_at: ChronoDateTimeWithTimeZone,
}

impl From<SummaryRow> for SubmissionSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            first_name: row.first_name,
            address: row.address,
            gender: row.gender,
            height: row.height,
            created_at: row.created_at.with_timezone(&Utc),
        }
    }
}

impl From<actor_entity::Model> for Submission {
    fn from(model: actor_entity::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            description: model.description,
            first_name: model.first_name,
            last_name: model.last_name,
            address: model.address,
            height: model.height,
            weight: model.weight,
            gender: model.gender,
            age: model.age,
            raw_ai_response: model.raw_ai_response,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// 把唯一约束冲突映射到具体字段
fn map_insert_error(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        // Postgres reports the index name, SQLite reports table.column
        if message.contains("email") {
            return RepositoryError::Duplicate(UniqueField::Email);
        }
        if message.contains("description") {
            return RepositoryError::Duplicate(UniqueField::Description);
        }
        warn!(%message, "Unrecognized unique constraint violation");
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl SubmissionRepository for SubmissionRepositoryImpl {
    async fn create(&self, submission: NewSubmission) -> Result<Submission, RepositoryError> {
        let active_model = actor_entity::ActiveModel {
            id: NotSet,
            email: Set(submission.email),
            description: Set(submission.description),
            first_name: Set(submission.first_name),
            last_name: Set(submission.last_name),
            address: Set(submission.address),
            height: Set(submission.height),
            weight: Set(submission.weight),
            gender: Set(submission.gender),
            age: Set(submission.age),
            raw_ai_response: Set(submission.raw_ai_response),
            created_at: Set(submission.created_at.into()),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(map_insert_error)?;

        debug!(id = model.id, "Actor submission stored");
        Ok(model.into())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let count = actor_entity::Entity::find()
            .filter(actor_entity::Column::Email.eq(email))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_description(&self, description: &str) -> Result<bool, RepositoryError> {
        let count = actor_entity::Entity::find()
            .filter(actor_entity::Column::Description.eq(description))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<SubmissionSummary>, RepositoryError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let paginator = actor_entity::Entity::find()
            .select_only()
            .columns([
                actor_entity::Column::FirstName,
                actor_entity::Column::Address,
                actor_entity::Column::Gender,
                actor_entity::Column::Height,
                actor_entity::Column::CreatedAt,
            ])
            .order_by_desc(actor_entity::Column::CreatedAt)
            .order_by_asc(actor_entity::Column::Id)
            .into_model::<SummaryRow>()
            .paginate(self.db.as_ref(), per_page);

        let total = paginator.num_items().await?;

        // Offsets past the last page may not fit in u64
        if page > total.div_ceil(per_page).max(1) {
            debug!(page, total, "Requested page is past the end");
            return Ok(Page::new(Vec::new(), page, per_page, total));
        }

        let rows = paginator.fetch_page(page - 1).await?;

        Ok(Page::new(
            rows.into_iter().map(SubmissionSummary::from).collect(),
            page,
            per_page,
            total,
        ))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(actor_entity::Entity::find()
            .count(self.db.as_ref())
            .await?)
    }
}
