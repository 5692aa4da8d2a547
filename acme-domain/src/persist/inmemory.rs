use std::sync::{Mutex, MutexGuard};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::persist::{Repository, UniqueKey};
use crate::specification::Specification;
use crate::value_object::Version;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// 基于 DashMap 的内存仓储
///
/// 写入（插入与条件保存）串行执行：唯一索引检查、版本比较与替换在同一把写锁内完成，
/// 同一实体的并发写入至多一个成功，唯一字段不会出现重复。读取不受写锁影响。
pub struct InMemoryRepository<E>
where
    E: Entity,
{
    store: DashMap<E::Id, E>,
    unique: Vec<UniqueKey<E>>,
    writes: Mutex<()>,
}

impl<E> InMemoryRepository<E>
where
    E: Entity,
{
    pub fn new() -> Self {
        Self::with_unique_keys(Vec::new())
    }

    /// 带唯一索引的仓储
    pub fn with_unique_keys(unique: Vec<UniqueKey<E>>) -> Self {
        Self {
            store: DashMap::new(),
            unique,
            writes: Mutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn lock_writes(&self) -> DomainResult<MutexGuard<'_, ()>> {
        self.writes.lock().map_err(|_| DomainError::Repository {
            reason: "write lock poisoned".into(),
        })
    }

    /// 调用方须持有写锁
    fn check_unique(&self, entity: &E) -> DomainResult<()> {
        for key in &self.unique {
            let Some(value) = key.value_of(entity) else {
                continue;
            };
            let taken = self.store.iter().any(|other| {
                other.key() != entity.id()
                    && key.value_of(other.value()).as_deref() == Some(value.as_str())
            });
            if taken {
                tracing::debug!(id = %entity.id(), field = key.field(), %value, "unique index rejected write");
                return Err(DomainError::UniqueViolation {
                    field: key.field(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl<E> Default for InMemoryRepository<E>
where
    E: Entity,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>> {
        Ok(self.store.get(id).map(|e| e.value().clone()))
    }

    async fn find(&self, spec: &dyn Specification<E>) -> DomainResult<Vec<E>> {
        Ok(self
            .store
            .iter()
            .filter(|e| spec.is_satisfied_by(e.value()))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn exists(&self, spec: &dyn Specification<E>) -> DomainResult<bool> {
        Ok(self.store.iter().any(|e| spec.is_satisfied_by(e.value())))
    }

    async fn insert(&self, mut entity: E) -> DomainResult<E> {
        let _writes = self.lock_writes()?;
        self.check_unique(&entity)?;

        match self.store.entry(entity.id().clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateId {
                id: entity.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                entity.set_version(Version::new());
                slot.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    async fn save(&self, mut entity: E, expected: Version) -> DomainResult<E> {
        let _writes = self.lock_writes()?;
        let Some(actual) = self.store.get(entity.id()).map(|e| e.version()) else {
            return Err(DomainError::NotFound {
                id: entity.id().to_string(),
            });
        };

        if actual != expected {
            tracing::debug!(id = %entity.id(), %expected, %actual, "conditional save rejected");
            return Err(DomainError::VersionConflict { expected, actual });
        }
        self.check_unique(&entity)?;

        // 删除不持写锁，此处可能已被移除
        let Some(mut stored) = self.store.get_mut(entity.id()) else {
            return Err(DomainError::NotFound {
                id: entity.id().to_string(),
            });
        };
        entity.set_version(actual.next());
        *stored = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, spec: &dyn Specification<E>) -> DomainResult<usize> {
        let mut removed = 0;
        self.store.retain(|_, e| {
            let hit = spec.is_satisfied_by(e);
            if hit {
                removed += 1;
            }
            !hit
        });
        Ok(removed)
    }
}
