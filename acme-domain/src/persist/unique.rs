use std::sync::Arc;

use crate::entity::Entity;
use crate::specification::{Specification, spec};

type Extract<E> = Arc<dyn Fn(&E) -> Option<String> + Send + Sync>;

/// 唯一字段：字段名与取值函数
///
/// 取值为 `None` 的实体不参与唯一性约束。
pub struct UniqueKey<E> {
    field: &'static str,
    value: Extract<E>,
}

impl<E> Clone for UniqueKey<E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            value: Arc::clone(&self.value),
        }
    }
}

impl<E> UniqueKey<E>
where
    E: Entity,
{
    pub fn new<F>(field: &'static str, value: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        Self {
            field,
            value: Arc::new(move |e: &E| Some(value(e))),
        }
    }

    /// 可选字段，未设置时不受约束
    pub fn optional<F>(field: &'static str, value: F) -> Self
    where
        F: Fn(&E) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            field,
            value: Arc::new(value),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn value_of(&self, entity: &E) -> Option<String> {
        (self.value)(entity)
    }

    /// 与 `candidate` 取值相同的其他实体；`candidate` 未设置该字段时为 `None`
    pub fn collides_with(&self, candidate: &E) -> Option<Box<dyn Specification<E>>> {
        let value = self.value_of(candidate)?;
        let own_id = candidate.id().clone();
        let get = Arc::clone(&self.value);
        Some(spec(move |other: &E| {
            other.id() != &own_id && get(other).as_deref() == Some(value.as_str())
        }))
    }
}

impl<E> std::fmt::Debug for UniqueKey<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueKey").field("field", &self.field).finish()
    }
}
