use bon::Builder;
use serde::{Deserialize, Serialize};

/// 管理员角色名
pub const ROLE_ADMIN: &str = "admin";

/// 业务上下文信息
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID（链路追踪）
    correlation_id: Option<String>,
    /// 调用者用户名
    actor_id: Option<String>,
    /// 调用者角色
    #[builder(default)]
    roles: Vec<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

/// 应用层上下文（Application Context）
///
/// 承载一次命令/查询所需的横切信息：
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、调用者与角色；
/// - 原始 `Authorization` 头部：调用其他服务时原样转发。
///
/// ```rust
/// use acme_application::context::{AppContext, BusinessContext};
///
/// let ctx = AppContext {
///     biz: BusinessContext::builder()
///         .correlation_id("cor-123".into())
///         .actor_id("alpha1".into())
///         .roles(vec!["kunde".into()])
///         .build(),
///     authorization: Some("Bearer eyJ...".into()),
/// };
/// assert_eq!(ctx.username(), Some("alpha1"));
/// assert!(!ctx.is_admin());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub biz: BusinessContext,
    pub authorization: Option<String>,
}

impl AppContext {
    /// 拥有全部权限的上下文（未启用认证或内部调用）
    pub fn admin() -> Self {
        Self {
            biz: BusinessContext::builder()
                .actor_id(ROLE_ADMIN.to_string())
                .roles(vec![ROLE_ADMIN.to_string()])
                .build(),
            authorization: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.biz.actor_id()
    }

    pub fn roles(&self) -> &[String] {
        self.biz.roles()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_context() {
        let ctx = AppContext::admin();
        assert!(ctx.is_admin());
        assert_eq!(ctx.username(), Some("admin"));
        assert!(ctx.authorization.is_none());
    }

    #[test]
    fn default_context_has_no_roles() {
        let ctx = AppContext::default();
        assert!(ctx.roles().is_empty());
        assert!(ctx.username().is_none());
        assert!(!ctx.is_admin());
    }
}
