use std::time::Duration;

use acme_web::config::{AuthConfig, DevConfig, LogConfig, ServerConfig, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// 服务名，同时是配置文件名与环境变量前缀（`BESTELLUNG_`）
pub const SERVICE: &str = "bestellung";

/// 客户服务的地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KundeServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for KundeServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 2000,
        }
    }
}

impl KundeServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestellungConfig {
    pub server: ServerConfig,
    pub timeouts: TimeoutConfig,
    pub log: LogConfig,
    pub auth: AuthConfig,
    pub kunde: KundeServiceConfig,
    pub dev: DevConfig,
}

impl Default for BestellungConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8081,
                ..ServerConfig::default()
            },
            timeouts: TimeoutConfig::default(),
            log: LogConfig::default(),
            auth: AuthConfig::default(),
            kunde: KundeServiceConfig::default(),
            dev: DevConfig::default(),
        }
    }
}

impl BestellungConfig {
    pub fn load() -> anyhow::Result<Self> {
        acme_web::config::load(SERVICE)
    }
}
