// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use crate::domain::repositories::submission_repository::UniqueField;

pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Please provide a valid email address.";
pub const EMAIL_TOO_LONG: &str = "The email field must not be greater than 255 characters.";
pub const EMAIL_TAKEN: &str = "This email has already been submitted.";
pub const DESCRIPTION_REQUIRED: &str = "Actor description is required.";
pub const DESCRIPTION_TOO_SHORT: &str = "Description must be at least 10 characters long.";
pub const DESCRIPTION_TAKEN: &str = "This description has already been submitted.";

/// 演员提交表单DTO
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SubmitActorRequestDto {
    /// 提交者邮箱（必填，唯一）
    #[serde(default)]
    #[validate(
        required(message = "Email is required."),
        email(message = "Please provide a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    /// 演员描述（必填，至少 10 个字符，唯一）
    #[serde(default)]
    #[validate(
        required(message = "Actor description is required."),
        length(min = 10, message = "Description must be at least 10 characters long.")
    )]
    pub description: Option<String>,
}

impl SubmitActorRequestDto {
    /// 去掉首尾空白，空字符串视为未填写
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            email: clean(self.email),
            description: clean(self.description),
        }
    }
}

/// 唯一性冲突对应的提示
pub fn unique_message(field: UniqueField) -> &'static str {
    match field {
        UniqueField::Email => EMAIL_TAKEN,
        UniqueField::Description => DESCRIPTION_TAKEN,
    }
}

/// 按字段分组的错误信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 第一条错误信息，用作响应中的概要
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}
