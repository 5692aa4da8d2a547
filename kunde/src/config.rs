use acme_web::config::{AuthConfig, DevConfig, LogConfig, MailConfig, ServerConfig, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// 服务名，同时是配置文件名与环境变量前缀（`KUNDE_`）
pub const SERVICE: &str = "kunde";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KundeConfig {
    pub server: ServerConfig,
    pub timeouts: TimeoutConfig,
    pub log: LogConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub dev: DevConfig,
}

impl KundeConfig {
    pub fn load() -> anyhow::Result<Self> {
        acme_web::config::load(SERVICE)
    }
}
