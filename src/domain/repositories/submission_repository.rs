// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::submission::{NewSubmission, Page, Submission, SubmissionSummary};
use async_trait::async_trait;
use sea_orm::DbErr;
use std::fmt;
use thiserror::Error;

/// 需要全局唯一的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Description,
}

impl UniqueField {
    /// 表单中的字段名
    pub fn field_name(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Description => "description",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 唯一约束冲突
    #[error("Duplicate value for {0}")]
    Duplicate(UniqueField),
}

/// 提交记录仓库特质
///
/// 写入端负责原子创建并检测唯一约束冲突，读取端负责按创建时间倒序分页
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// 原子写入一条完整记录
    async fn create(&self, submission: NewSubmission) -> Result<Submission, RepositoryError>;
    /// 邮箱是否已被提交过
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
    /// 描述是否已被提交过
    async fn exists_by_description(&self, description: &str) -> Result<bool, RepositoryError>;
    /// 获取第 `page` 页（从 1 开始）的列表投影
    async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<SubmissionSummary>, RepositoryError>;
    /// 记录总数
    async fn count(&self) -> Result<u64, RepositoryError>;
}
