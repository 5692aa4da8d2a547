//! 服务共用的 HTTP 基础设施（acme-web）
//!
//! - `config`：figment 分层配置（默认值 ← YAML 文件 ← 环境变量）
//! - `telemetry`：tracing 订阅器初始化
//! - `hal`：HAL 风格的实体/集合包装与基础 URI
//! - `headers`：`If-Match` / `If-None-Match` / `ETag`
//! - `error`：统一的错误响应 `ApiError`
//! - `responses`：结果枚举到响应的映射
//! - `auth`：JWT 认证，产出 `AppContext`
//! - `server`：启动与优雅关闭
//!
pub mod auth;
pub mod config;
pub mod error;
pub mod hal;
pub mod headers;
pub mod responses;
pub mod server;
pub mod telemetry;
