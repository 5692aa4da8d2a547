//! 持久化（persist）
//!
//! 定义文档仓储协议与内存实现：
//! - 按标识/规约查询与存在性检查（`Repository`）；
//! - 插入时版本置 0，条件保存时按期望版本比较并交换（CAS），
//!   不一致时返回 `DomainError::VersionConflict`；
//! - 唯一字段（`UniqueKey`）在写入时由存储强制，重复时返回 `DomainError::UniqueViolation`；
//! - 基于 DashMap 的 `InMemoryRepository`。
//!
mod inmemory;
mod repository;
mod unique;

pub use inmemory::InMemoryRepository;
pub use repository::Repository;
pub use unique::UniqueKey;
