//! 存储调用的时限
//!
use std::future::Future;
use std::time::Duration;

use acme_domain::error::DomainResult;

use crate::error::AppError;

/// 点操作与扫描操作的时限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// 按标识读取、插入、条件保存、存在性检查
    pub short: Duration,
    /// 条件查询与批量删除
    pub long: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(500),
            long: Duration::from_millis(2000),
        }
    }
}

/// 在时限内等待一次仓储调用，超时返回 `AppError::Timeout`
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(operation, millis = limit.as_millis(), "store call timed out");
            Err(AppError::Timeout {
                operation,
                millis: limit.as_millis(),
            })
        }
    }
}
