//! 补丁操作（PATCH）
//!
//! 补丁作用于从仓储加载的实体副本：`replace` 覆盖标量，
//! `add`/`remove` 向集合插入或删除一个元素。重复添加与删除不存在的元素均为空操作。
//! 不支持的路径或无法解析的取值返回 [`PatchError`]，实体保持不变。
//!
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 补丁操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl std::fmt::Display for PatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        };
        f.write_str(s)
    }
}

/// 单条补丁操作：`{"op": "replace", "path": "/nachname", "value": "Beta"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default)]
    pub value: String,
}

impl PatchOperation {
    pub fn new(op: PatchOp, path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(PatchOp::Replace, path, value)
    }

    pub fn add(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(PatchOp::Add, path, value)
    }

    pub fn remove(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(PatchOp::Remove, path, value)
    }
}

/// 补丁应用失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("unsupported patch: op={op}, path={path}")]
    UnsupportedPath { op: PatchOp, path: String },
    #[error("invalid value for {path}: {value:?} ({reason})")]
    InvalidValue {
        path: String,
        value: String,
        reason: String,
    },
}

impl PatchError {
    pub fn unsupported(op: &PatchOp, path: &str) -> Self {
        PatchError::UnsupportedPath {
            op: *op,
            path: path.to_string(),
        }
    }
}

/// 可打补丁的实体
///
/// 只需实现支持的操作；未实现的操作默认返回 `UnsupportedPath`。
pub trait Patchable {
    fn replace(&mut self, path: &str, value: &str) -> Result<(), PatchError>;

    fn add(&mut self, path: &str, _value: &str) -> Result<(), PatchError> {
        Err(PatchError::unsupported(&PatchOp::Add, path))
    }

    fn remove(&mut self, path: &str, _value: &str) -> Result<(), PatchError> {
        Err(PatchError::unsupported(&PatchOp::Remove, path))
    }
}

/// 依次应用补丁操作；任一操作失败时返回错误，原实体不受影响
pub fn apply_patch<E>(entity: &E, operations: &[PatchOperation]) -> Result<E, PatchError>
where
    E: Patchable + Clone,
{
    let mut patched = entity.clone();
    for operation in operations {
        let PatchOperation { op, path, value } = operation;
        match op {
            PatchOp::Replace => patched.replace(path, value)?,
            PatchOp::Add => patched.add(path, value)?,
            PatchOp::Remove => patched.remove(path, value)?,
        }
    }
    Ok(patched)
}

/// 解析补丁取值
pub fn parse_value<T>(path: &str, value: &str) -> Result<T, PatchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| PatchError::InvalidValue {
        path: path.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// 解析可选取值：空串表示清空
pub fn parse_optional<T>(path: &str, value: &str) -> Result<Option<T>, PatchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if value.is_empty() {
        return Ok(None);
    }
    parse_value(path, value).map(Some)
}

/// 向集合添加解析后的元素，已存在时不变
pub fn add_to_set<T>(set: &mut BTreeSet<T>, path: &str, value: &str) -> Result<(), PatchError>
where
    T: FromStr + Ord,
    T::Err: std::fmt::Display,
{
    set.insert(parse_value(path, value)?);
    Ok(())
}

/// 从集合删除解析后的元素，不存在时不变
pub fn remove_from_set<T>(set: &mut BTreeSet<T>, path: &str, value: &str) -> Result<(), PatchError>
where
    T: FromStr + Ord,
    T::Err: std::fmt::Display,
{
    let item: T = parse_value(path, value)?;
    set.remove(&item);
    Ok(())
}
