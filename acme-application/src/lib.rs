//! 应用层（acme-application）
//!
//! - 命令/查询与进程内总线（`bus`）
//! - 结果枚举：`CreateResult`、`UpdateResult`、`FindByIdResult`
//! - 唯一性检查（`uniqueness`）与更新编排（`service::EntityService`）
//! - 存储调用时限（`timeout`）
//! - 邮件协作方（`mail`）
//!
pub mod bus;
pub mod command;
pub mod context;
pub mod error;
pub mod mail;
pub mod query;
pub mod result;
pub mod service;
pub mod timeout;
pub mod uniqueness;

pub use bus::{InMemoryCommandBus, InMemoryQueryBus};
