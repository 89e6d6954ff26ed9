// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::submission::ExtractedRecord;

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// 身份字段校验
///
/// 仅当名字、姓氏和地址都存在且非空时返回 true；空白字符串视为缺失
pub fn is_complete(record: &ExtractedRecord) -> bool {
    present(&record.first_name) && present(&record.last_name) && present(&record.address)
}
