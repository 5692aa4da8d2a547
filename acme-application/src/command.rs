//! 命令：改变实体状态的请求
//!
//! 预期内的业务失败（校验、版本、唯一性）放在 `Output` 的结果枚举里，
//! `AppError` 只承载基础设施故障。
//!
use async_trait::async_trait;

use crate::{context::AppContext, error::AppError};

pub trait Command: Send + Sync + 'static {
    /// 稳定名称，用于日志与注册冲突报告
    const NAME: &'static str;

    type Output: Send + 'static;
}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;
}

/// 把命令路由到唯一的处理器
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;
}
