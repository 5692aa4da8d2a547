//! 查询：只读请求
//!
use async_trait::async_trait;

use crate::{context::AppContext, error::AppError};

pub trait Query: Send + Sync + 'static {
    const NAME: &'static str;

    type Output: Send + 'static;
}

#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, ctx: &AppContext, q: Q) -> Result<Q::Output, AppError>;
}

#[async_trait]
pub trait QueryBus: Send + Sync {
    async fn dispatch<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Output, AppError>;
}
