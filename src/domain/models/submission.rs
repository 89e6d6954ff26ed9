// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 每页固定条数
pub const PAGE_SIZE: u64 = 15;

/// 从补全响应中提取出的演员信息
///
/// 七个字段始终存在，上游缺失的字段为 `None`；
/// `raw_ai_response` 保存完整的上游响应用于审计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub raw_ai_response: Value,
}

/// 已持久化的演员提交记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// 自增主键，同一时间戳下按它区分先后
    pub id: i32,
    /// 提交者邮箱，全局唯一
    pub email: String,
    /// 原始描述文本，全局唯一
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    /// 完整的上游响应
    pub raw_ai_response: Value,
    /// 创建时间，写入后不再修改
    pub created_at: DateTime<Utc>,
}

/// 待写入的提交记录
///
/// 通常由 [`NewSubmission::from_extraction`] 从通过字段校验的提取结果构造，
/// 三个身份字段都是非空的 `String`
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub email: String,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub raw_ai_response: Value,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    /// 由提取结果构造待写入记录
    ///
    /// 身份字段缺失或为空时返回 `None`
    pub fn from_extraction(
        email: String,
        description: String,
        record: ExtractedRecord,
    ) -> Option<Self> {
        let first_name = non_empty(record.first_name)?;
        let last_name = non_empty(record.last_name)?;
        let address = non_empty(record.address)?;

        Some(Self {
            email,
            description,
            first_name,
            last_name,
            address,
            height: record.height,
            weight: record.weight,
            gender: record.gender,
            age: record.age,
            raw_ai_response: record.raw_ai_response,
            created_at: Utc::now(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 列表页展示的字段子集
///
/// 不包含邮箱、描述、姓氏、体重和年龄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub first_name: String,
    pub address: String,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        let last_page = if per_page == 0 {
            1
        } else {
            total.div_ceil(per_page).max(1)
        };

        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
        }
    }
}

/// 规范化页码：缺失、无法解析或小于 1 时返回 1
pub fn normalize_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
