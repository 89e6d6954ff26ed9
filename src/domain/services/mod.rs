// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取客户端（extraction_client）：构造补全请求，带超时与重试地调用上游接口
/// - 提取解析（extraction_parser）：把补全内容解码为固定的七字段结果
/// - 字段校验（field_gate）：检查名字、姓氏、地址是否齐全
/// - 提取服务（extraction_service）：串联以上步骤
pub mod extraction_client;
pub mod extraction_parser;
pub mod extraction_service;
pub mod field_gate;
