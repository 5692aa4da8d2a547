//! 分层配置
//!
//! 优先级从低到高：结构体默认值 → YAML 文件 → 环境变量。
//! - YAML 文件默认为 `<service>.yaml`，可通过 `<SERVICE>_CONFIG` 指定路径，文件不存在时跳过；
//! - 环境变量前缀为 `<SERVICE>_`，以 `__` 表示嵌套，例如 `KUNDE_SERVER__PORT=8081`。
//!
use std::time::Duration;

use acme_application::timeout::Timeouts;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 存储调用时限（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub short_ms: u64,
    pub long_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            short_ms: 500,
            long_ms: 2000,
        }
    }
}

impl TimeoutConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            short: Duration::from_millis(self.short_ms),
            long: Duration::from_millis(self.long_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 以 JSON 输出日志
    pub json: bool,
}

/// 认证配置；未配置密钥时关闭认证，所有请求以管理员身份执行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// 关闭时只写日志
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub from: String,
    pub sales: String,
    pub timeout_ms: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "localhost".to_string(),
            port: 25,
            from: "Theo Test <theo@test.de>".to_string(),
            sales: "Maxi Musterfrau <maxi.musterfrau@test.de>".to_string(),
            timeout_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    /// 启动时清空存储并写入测试数据
    pub populate: bool,
}

/// 构造某个服务的分层配置源
pub fn figment<T>(service: &str) -> Figment
where
    T: Serialize + Default,
{
    let prefix = format!("{}_", service.to_uppercase());
    let path = std::env::var(format!("{prefix}CONFIG"))
        .unwrap_or_else(|_| format!("{service}.yaml"));

    Figment::new()
        .merge(Serialized::defaults(T::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(&prefix).split("__"))
}

/// 读取某个服务的配置
pub fn load<T>(service: &str) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let cfg = figment::<T>(service).extract()?;
    Ok(cfg)
}
