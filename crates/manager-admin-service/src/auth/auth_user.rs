//! 当前登录用户

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// 用户域
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Manager,
    Store,
    Member,
}

/// 登录用户上下文
///
/// 由 JWT 的 `userContext` 声明解析而来，认证中间件注入到请求扩展
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    /// 超级管理员跳过权限校验
    #[serde(default)]
    pub is_super: bool,
    #[serde(default)]
    pub role: UserRole,
}

impl AuthUser {
    pub fn manager(id: impl Into<String>, username: impl Into<String>, is_super: bool) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            nick_name: None,
            is_super,
            role: UserRole::Manager,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AdminError::Unauthorized("请先登录".to_string()))
    }
}
