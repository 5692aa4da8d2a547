use acme_domain::error::DomainError;

/// 应用层错误：存储故障、超时与总线配置错误
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    /// 存储调用超过时限
    #[error("timeout: operation={operation}, limit={millis}ms")]
    Timeout {
        operation: &'static str,
        millis: u128,
    },

    /// 外部协作方（邮件、远程服务）故障
    #[error("infra: {0}")]
    Infra(String),

    #[error("no handler registered for {0}")]
    HandlerNotFound(&'static str),

    #[error("{kind} handler already registered: {name}")]
    AlreadyRegistered {
        kind: &'static str,
        name: &'static str,
    },

    #[error("type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },
}
