//! JWT 认证
//!
//! 校验 `Authorization: Bearer <token>`（HS256），从声明中取出用户名与角色：
//! - 用户名：`preferred_username`，缺失时取 `sub`
//! - 角色：`realm_access.roles`，缺失时取 `roles`
//!
//! 未配置密钥时认证关闭，每个请求都以管理员身份执行。
//!
use std::sync::Arc;

use acme_application::context::{AppContext, BusinessContext, ROLE_ADMIN};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::error::ApiError;

const BEARER: &str = "Bearer ";

struct Verifier {
    key: DecodingKey,
    validation: Validation,
}

#[derive(Clone)]
pub struct Authenticator {
    verifier: Option<Arc<Verifier>>,
}

impl Authenticator {
    pub fn new(cfg: &AuthConfig) -> Self {
        let verifier = cfg.jwt_secret.as_ref().map(|secret| {
            Arc::new(Verifier {
                key: DecodingKey::from_secret(secret.as_bytes()),
                validation: Validation::new(Algorithm::HS256),
            })
        });
        if verifier.is_none() {
            tracing::warn!("no jwt secret configured, authentication disabled");
        }
        Self { verifier }
    }

    pub fn disabled() -> Self {
        Self { verifier: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    /// 根据 `Authorization` 头部构造调用上下文
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        correlation_id: Option<String>,
    ) -> Result<AppContext, ApiError> {
        let Some(verifier) = &self.verifier else {
            let biz = BusinessContext::builder()
                .maybe_correlation_id(correlation_id)
                .actor_id(ROLE_ADMIN.to_string())
                .roles(vec![ROLE_ADMIN.to_string()])
                .build();
            return Ok(AppContext {
                biz,
                authorization: authorization.map(str::to_string),
            });
        };

        let header = authorization.ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        let token = header
            .strip_prefix(BEARER)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

        let claims = decode::<Value>(token, &verifier.key, &verifier.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "jwt rejected");
                ApiError::unauthorized("invalid token")
            })?
            .claims;

        let username = claims
            .get("preferred_username")
            .or_else(|| claims.get("sub"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let roles = roles_of(&claims);
        tracing::trace!(username = ?username, roles = ?roles, "authenticated");

        let biz = BusinessContext::builder()
            .maybe_correlation_id(correlation_id)
            .maybe_actor_id(username)
            .roles(roles)
            .build();
        Ok(AppContext {
            biz,
            authorization: Some(header.to_string()),
        })
    }
}

fn roles_of(claims: &Value) -> Vec<String> {
    let roles = claims
        .pointer("/realm_access/roles")
        .or_else(|| claims.get("roles"))
        .and_then(Value::as_array);
    roles
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// 请求的调用上下文
pub struct Ctx(pub AppContext);

impl<S> FromRequestParts<S> for Ctx
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Authenticator::from_ref(state);
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let correlation_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        authenticator
            .authenticate(authorization, Some(correlation_id))
            .map(Ctx)
    }
}
