//! 应用层结果枚举
//!
//! 预期内的业务结果均为封闭枚举，由接口层逐一映射为响应。
//!
use acme_domain::validation::Violations;
use acme_domain::value_object::Version;

/// 创建结果
#[derive(Debug, Clone, PartialEq)]
pub enum CreateResult<E> {
    Success(E),
    ConstraintViolations(Violations),
    /// 唯一字段与已存储的实体冲突
    AlreadyExists { field: &'static str, value: String },
    /// 未指定有效的账户
    InvalidAccount,
}

/// 更新结果（PUT 与 PATCH 共用）
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateResult<E> {
    /// 写入成功，版本已加一
    Success(E),
    /// 校验失败，未访问存储
    ConstraintViolations(Violations),
    NotFound,
    /// 版本号无法解析，携带客户端提交的文本
    VersionInvalid(String),
    /// 客户端版本与存储版本不一致，携带客户端版本
    VersionOutdated(Version),
    AlreadyExists { field: &'static str, value: String },
    /// 补丁路径不支持或取值无法解析
    InvalidPatch(String),
}

impl<E> UpdateResult<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateResult::Success(_))
    }
}

/// 按标识读取的结果
#[derive(Debug, Clone, PartialEq)]
pub enum FindByIdResult<E> {
    Success(E),
    NotFound,
    /// 调用者既非所有者也非管理员，携带调用者的角色
    AccessForbidden(Vec<String>),
}
