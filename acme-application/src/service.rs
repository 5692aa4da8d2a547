//! 实体服务与更新编排（Update Orchestrator）
//!
//! 更新按固定顺序执行，任一步失败即返回对应结果：
//! 校验 → 读取当前实体 → 版本号解析 → 唯一性检查 → 条件写入。
//! 条件写入以客户端版本为期望版本；存储返回版本冲突时结果为 `VersionOutdated`，
//! 返回唯一索引冲突时结果为 `AlreadyExists`。本层不做冲突重试。
//!
use std::sync::Arc;

use acme_domain::entity::Entity;
use acme_domain::error::DomainError;
use acme_domain::patch::{PatchOperation, Patchable, apply_patch};
use acme_domain::persist::Repository;
use acme_domain::precondition::{VersionCheck, check_version};
use acme_domain::specification::Specification;
use acme_domain::validation::Validate;
use acme_domain::value_object::Version;

use crate::error::AppError;
use crate::result::{CreateResult, UpdateResult};
use crate::timeout::{Timeouts, bounded};
use crate::uniqueness::UniquenessChecker;

pub struct EntityService<E>
where
    E: Entity,
{
    repo: Arc<dyn Repository<E>>,
    uniqueness: UniquenessChecker<E>,
    timeouts: Timeouts,
    preserved: Option<fn(&E, &mut E)>,
}

impl<E> EntityService<E>
where
    E: Entity + Validate,
{
    pub fn new(
        repo: Arc<dyn Repository<E>>,
        uniqueness: UniquenessChecker<E>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            repo,
            uniqueness,
            timeouts,
            preserved: None,
        }
    }

    /// 更新时从存储中的当前实体沿用的字段（如所有者），客户端提交的取值被忽略
    pub fn with_preserved(mut self, preserve: fn(&E, &mut E)) -> Self {
        self.preserved = Some(preserve);
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// 新建实体：校验 → 唯一性检查 → 插入（版本 0）
    pub async fn create(&self, entity: E) -> Result<CreateResult<E>, AppError> {
        let violations = entity.validate();
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "create: constraint violations");
            return Ok(CreateResult::ConstraintViolations(violations));
        }

        if let Some(c) = self
            .uniqueness
            .may_conflict(&self.repo, None, &entity, self.timeouts.short)
            .await?
        {
            return Ok(CreateResult::AlreadyExists {
                field: c.field,
                value: c.value,
            });
        }

        match bounded("insert", self.timeouts.short, self.repo.insert(entity)).await {
            Ok(created) => {
                tracing::debug!(id = %created.id(), "created");
                Ok(CreateResult::Success(created))
            }
            Err(AppError::Domain(DomainError::UniqueViolation { field, value })) => {
                Ok(CreateResult::AlreadyExists { field, value })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, AppError> {
        bounded("find_by_id", self.timeouts.short, self.repo.find_by_id(id)).await
    }

    pub async fn find(&self, spec: &dyn Specification<E>) -> Result<Vec<E>, AppError> {
        bounded("find", self.timeouts.long, self.repo.find(spec)).await
    }

    /// 以完整实体替换（PUT）
    ///
    /// `if_match` 为客户端提交的 `If-Match` 原文（含引号）。
    pub async fn update(
        &self,
        id: &E::Id,
        mut entity: E,
        if_match: &str,
    ) -> Result<UpdateResult<E>, AppError> {
        let violations = entity.validate();
        if !violations.is_empty() {
            tracing::debug!(%id, count = violations.len(), "update: constraint violations");
            return Ok(UpdateResult::ConstraintViolations(violations));
        }

        let Some(current) = self.find_by_id(id).await? else {
            return Ok(UpdateResult::NotFound);
        };

        entity.set_id(current.id().clone());
        self.write(current, entity, if_match).await
    }

    /// 以补丁操作修改（PATCH）：读取 → 应用补丁 → 校验 → 其余步骤同 PUT
    pub async fn patch(
        &self,
        id: &E::Id,
        operations: &[PatchOperation],
        if_match: &str,
    ) -> Result<UpdateResult<E>, AppError>
    where
        E: Patchable,
    {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(UpdateResult::NotFound);
        };

        let patched = match apply_patch(&current, operations) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(%id, error = %e, "patch rejected");
                return Ok(UpdateResult::InvalidPatch(e.to_string()));
            }
        };

        let violations = patched.validate();
        if !violations.is_empty() {
            tracing::debug!(%id, count = violations.len(), "patch: constraint violations");
            return Ok(UpdateResult::ConstraintViolations(violations));
        }

        self.write(current, patched, if_match).await
    }

    /// 版本号解析 → 沿用字段 → 唯一性检查 → 条件写入
    async fn write(
        &self,
        current: E,
        mut entity: E,
        if_match: &str,
    ) -> Result<UpdateResult<E>, AppError> {
        let expected = match check_version(if_match) {
            VersionCheck::Parsed(v) => v,
            VersionCheck::Malformed(raw) => return Ok(UpdateResult::VersionInvalid(raw)),
        };
        if let Some(preserve) = self.preserved {
            preserve(&current, &mut entity);
        }
        tracing::trace!(id = %current.id(), %expected, stored = %current.version(), "update");

        if let Some(c) = self
            .uniqueness
            .may_conflict(&self.repo, Some(&current), &entity, self.timeouts.short)
            .await?
        {
            return Ok(UpdateResult::AlreadyExists {
                field: c.field,
                value: c.value,
            });
        }

        self.save(entity, expected).await
    }

    async fn save(&self, entity: E, expected: Version) -> Result<UpdateResult<E>, AppError> {
        match bounded("save", self.timeouts.short, self.repo.save(entity, expected)).await {
            Ok(saved) => {
                tracing::debug!(id = %saved.id(), version = %saved.version(), "updated");
                Ok(UpdateResult::Success(saved))
            }
            Err(AppError::Domain(DomainError::VersionConflict { expected, actual })) => {
                tracing::debug!(%expected, %actual, "version outdated");
                Ok(UpdateResult::VersionOutdated(expected))
            }
            // 读取之后被并发删除
            Err(AppError::Domain(DomainError::NotFound { .. })) => Ok(UpdateResult::NotFound),
            Err(AppError::Domain(DomainError::UniqueViolation { field, value })) => {
                Ok(UpdateResult::AlreadyExists { field, value })
            }
            Err(e) => Err(e),
        }
    }

    /// 删除满足规约的实体，返回删除数量
    pub async fn delete(&self, spec: &dyn Specification<E>) -> Result<usize, AppError> {
        let n = bounded("delete", self.timeouts.long, self.repo.delete(spec)).await?;
        tracing::debug!(count = n, "deleted");
        Ok(n)
    }
}
