// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use reqwest::StatusCode;
use std::time::Duration;

/// 重试策略配置
///
/// 固定间隔重试：首次请求失败后最多再尝试 `max_retries` 次，
/// 每次尝试之间等待 `delay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大重试次数（不含首次请求）
    pub max_retries: u32,
    /// 两次尝试之间的固定等待时间
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// 创建固定间隔重试策略
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// 不重试
    pub fn none() -> Self {
        Self::fixed(0, Duration::ZERO)
    }

    /// 总尝试次数上限
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// 第 `attempt` 次尝试（从 1 开始）失败后是否还能再试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// 整个调用的最长耗时上限：每次尝试的超时加上中间的等待
    pub fn worst_case(&self, per_attempt_timeout: Duration) -> Duration {
        per_attempt_timeout * self.max_attempts() + self.delay * self.max_retries
    }
}

/// 判断HTTP状态码是否属于瞬时失败
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

/// 判断传输层错误是否可重试
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        return true;
    }

    error.status().is_some_and(is_retryable_status)
}
