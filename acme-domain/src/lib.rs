//! 领域层基础库（acme-domain）
//!
//! 为版本化实体的乐观并发更新提供通用构件：
//! - 实体（`entity`）与版本号（`value_object::Version`）
//! - 校验引擎（`validation`）：一次性收集全部约束违反
//! - 冲突检测（`precondition`）：解析 `If-Match` 携带的版本号
//! - 补丁操作（`patch`）：`add`/`remove`/`replace` 作用于已加载的实体
//! - 规约（`specification`）：组合查询条件
//! - 仓储（`persist`）：按版本比较并交换（CAS）的条件写入，以及内存实现
//!
//! 本 crate 不依赖任何 Web 或存储框架，HTTP 映射与超时控制由上层负责。
//!
pub mod entity;
pub mod error;
pub mod patch;
pub mod persist;
pub mod precondition;
pub mod specification;
pub mod validation;
pub mod value_object;

// 允许在本 crate 内部通过 ::acme_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::acme_domain 路径。
extern crate self as acme_domain;
