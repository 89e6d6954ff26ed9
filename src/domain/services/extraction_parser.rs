// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, info};

use crate::domain::models::submission::ExtractedRecord;
use crate::domain::services::extraction_client::ExtractionError;

/// 补全内容中的七个字段
///
/// 未知字段被忽略，已知字段做宽松类型检查，类型不符时视为缺失
#[derive(Debug, Default, Deserialize)]
struct RawExtraction {
    #[serde(default, deserialize_with = "lenient_string")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    height: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    age: Option<i32>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_age))
}

/// 将年龄转换为整数
///
/// 整数原样保留，小数向零截断，数字字符串按同样规则转换，
/// 其他任何值（非数字字符串、布尔、数组、对象）返回 `None`
pub fn coerce_age(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).ok(),
            None => n.as_f64().and_then(truncate),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => i32::try_from(i).ok(),
                Err(_) => s.parse::<f64>().ok().and_then(truncate),
            }
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i32> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t < i32::MIN as f64 || t > i32::MAX as f64 {
        return None;
    }
    Some(t as i32)
}

/// 去掉可能包裹在内容外层的 Markdown 代码块标记
fn strip_code_fence(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// 将补全内容解析为提取结果
///
/// 只有内容无法解码为 JSON 时才返回错误；字段缺失一律视为 `None`。
/// 解码结果不是对象时，七个字段全部为 `None`。
///
/// # 参数
/// * `raw_content` - `choices[0].message.content`
/// * `full_response` - 完整的上游响应，原样保存在 `raw_ai_response`
pub fn parse(raw_content: &str, full_response: Value) -> Result<ExtractedRecord, ExtractionError> {
    let decoded: Value = match serde_json::from_str(strip_code_fence(raw_content)) {
        Ok(value) => value,
        Err(e) => {
            error!(content = %raw_content, json_error = %e, "JSON decode error");
            return Err(ExtractionError::Format(format!(
                "invalid JSON content: {}",
                e
            )));
        }
    };

    let raw = match decoded {
        Value::Object(_) => serde_json::from_value::<RawExtraction>(decoded).map_err(|e| {
            error!(json_error = %e, "Unexpected extraction shape");
            ExtractionError::Format(format!("unexpected extraction shape: {}", e))
        })?,
        other => {
            info!(content = %other, "Extraction content is not an object");
            RawExtraction::default()
        }
    };

    info!(
        first_name = ?raw.first_name,
        last_name = ?raw.last_name,
        address = ?raw.address,
        height = ?raw.height,
        weight = ?raw.weight,
        gender = ?raw.gender,
        age = ?raw.age,
        "Extracted data"
    );

    Ok(ExtractedRecord {
        first_name: raw.first_name,
        last_name: raw.last_name,
        address: raw.address,
        height: raw.height,
        weight: raw.weight,
        gender: raw.gender,
        age: raw.age,
        raw_ai_response: full_response,
    })
}
