// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义演员提交流程中的核心数据结构：
/// - 提取结果（ExtractedRecord）：补全接口返回的七个字段及原始响应
/// - 提交记录（Submission / NewSubmission）：持久化实体
/// - 列表投影（SubmissionSummary / Page）：只读展示结构
pub mod submission;
