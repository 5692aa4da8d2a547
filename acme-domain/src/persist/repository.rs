use crate::entity::Entity;
use crate::error::DomainResult;
use crate::specification::Specification;
use crate::value_object::Version;
use async_trait::async_trait;
use std::sync::Arc;

/// 实体仓储
///
/// 每次调用都是一次独立的存储往返，实现方不得在调用之间缓存实体。
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>>;

    async fn find(&self, spec: &dyn Specification<E>) -> DomainResult<Vec<E>>;

    async fn exists(&self, spec: &dyn Specification<E>) -> DomainResult<bool>;

    /// 插入新实体，版本置为 0；标识已存在时返回 `DuplicateId`
    async fn insert(&self, entity: E) -> DomainResult<E>;

    /// 条件保存：仅当存储中的版本等于 `expected` 时写入，并将版本加一
    ///
    /// - 标识不存在：`NotFound`
    /// - 版本不一致：`VersionConflict`
    async fn save(&self, entity: E, expected: Version) -> DomainResult<E>;

    /// 删除满足规约的实体，返回删除数量
    async fn delete(&self, spec: &dyn Specification<E>) -> DomainResult<usize>;
}

#[async_trait]
impl<E, T> Repository<E> for Arc<T>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>> {
        (**self).find_by_id(id).await
    }

    async fn find(&self, spec: &dyn Specification<E>) -> DomainResult<Vec<E>> {
        (**self).find(spec).await
    }

    async fn exists(&self, spec: &dyn Specification<E>) -> DomainResult<bool> {
        (**self).exists(spec).await
    }

    async fn insert(&self, entity: E) -> DomainResult<E> {
        (**self).insert(entity).await
    }

    async fn save(&self, entity: E, expected: Version) -> DomainResult<E> {
        (**self).save(entity, expected).await
    }

    async fn delete(&self, spec: &dyn Specification<E>) -> DomainResult<usize> {
        (**self).delete(spec).await
    }
}
