//! 领域层错误
//!
//! 只覆盖存储与解析故障，以及存储在写入时拒绝的版本冲突与唯一索引冲突。
//! 校验失败等预期结果由应用层的结果枚举表达。
//!
use thiserror::Error;

use crate::value_object::Version;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    /// 文本无法解析为目标类型（枚举码、标识等）
    #[error("parse error: {reason}")]
    Parse { reason: String },

    /// 条件写入的目标不存在
    #[error("entity not found: id={id}")]
    NotFound { id: String },

    #[error("duplicate id: {id}")]
    DuplicateId { id: String },

    /// 条件写入时存储中的版本与期望不一致
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: Version, actual: Version },

    /// 写入会使唯一字段与其他实体重复
    #[error("unique violation: {field}={value}")]
    UniqueViolation { field: &'static str, value: String },

    /// 存储后端故障
    #[error("repository error: {reason}")]
    Repository { reason: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        Self::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_display() {
        let err = DomainError::VersionConflict {
            expected: Version::from_value(0),
            actual: Version::from_value(1),
        };
        assert!(err.is_version_conflict());
        assert_eq!(err.to_string(), "version conflict: expected=v0, actual=v1");
        assert!(!DomainError::parse("x").is_version_conflict());
    }

    #[test]
    fn unique_violation_display() {
        let err = DomainError::UniqueViolation {
            field: "email",
            value: "a@acme.de".into(),
        };
        assert_eq!(err.to_string(), "unique violation: email=a@acme.de");
    }

    #[test]
    fn uuid_error_is_parse_error() {
        let err: DomainError = uuid::Uuid::parse_str("nope").unwrap_err().into();
        assert!(matches!(err, DomainError::Parse { .. }));
    }
}
