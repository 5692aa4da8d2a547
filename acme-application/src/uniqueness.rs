//! 唯一性检查（Uniqueness Checker）
//!
//! 更新时只有唯一字段的取值发生变化才会查询存储；
//! 创建时总是查询。查询条件排除实体自身。
//! 这里的查询只为尽早给出结果，并发写入之间的重复由存储的唯一索引拒绝。
//!
use std::sync::Arc;
use std::time::Duration;

use acme_domain::entity::Entity;
use acme_domain::persist::Repository;

pub use acme_domain::persist::UniqueKey;

use crate::error::AppError;
use crate::timeout::bounded;

/// 冲突的唯一字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub field: &'static str,
    pub value: String,
}

/// 按顺序检查所有唯一字段，返回第一个冲突
pub struct UniquenessChecker<E> {
    keys: Vec<UniqueKey<E>>,
}

impl<E> Default for UniquenessChecker<E> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<E> UniquenessChecker<E>
where
    E: Entity,
{
    pub fn new(keys: Vec<UniqueKey<E>>) -> Self {
        Self { keys }
    }

    /// 无唯一字段
    pub fn none() -> Self {
        Self::default()
    }

    /// 检查 `new` 的唯一字段
    ///
    /// `old` 为存储中的当前实体（更新）或 `None`（创建）。
    /// 取值未变化的字段不会产生任何存储查询。
    pub async fn may_conflict(
        &self,
        repo: &Arc<dyn Repository<E>>,
        old: Option<&E>,
        new: &E,
        limit: Duration,
    ) -> Result<Option<Collision>, AppError> {
        for key in &self.keys {
            let value = key.value_of(new);
            if let Some(old) = old {
                if key.value_of(old) == value {
                    tracing::trace!(field = key.field(), "unique field unchanged");
                    continue;
                }
            }

            let (Some(value), Some(collides)) = (value, key.collides_with(new)) else {
                continue;
            };
            if bounded("exists", limit, repo.exists(collides.as_ref())).await? {
                tracing::debug!(field = key.field(), value = %value, "unique field collides");
                return Ok(Some(Collision {
                    field: key.field(),
                    value,
                }));
            }
        }
        Ok(None)
    }
}
