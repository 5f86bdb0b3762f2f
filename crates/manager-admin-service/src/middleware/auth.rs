//! 管理端认证中间件
//!
//! 校验 `accessToken` 请求头中的 JWT，确认会话仍在缓存中有效，
//! 再按缓存的路径权限做接口级鉴权，最后将 [`AuthUser`] 注入请求扩展。

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::Response,
};
use mall_shared::cache::{CachePrefix, CacheStore};
use tracing::{debug, error, warn};

use super::permission::UserPermissions;
use crate::auth::{AuthUser, JwtManager};
use crate::error::AdminError;

/// 令牌请求头
pub const ACCESS_TOKEN_HEADER: &str = "accessToken";

/// 缓存键的用户域
const MANAGER_SCOPE: &str = "MANAGER";

/// 认证中间件依赖
#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtManager>,
    pub cache: Arc<dyn CacheStore>,
}

impl AuthState {
    pub fn new(jwt: Arc<JwtManager>, cache: Arc<dyn CacheStore>) -> Self {
        Self { jwt, cache }
    }

    /// 会话键：`{ACCESS_TOKEN}_MANAGER_<jwt>`
    pub fn session_key(token: &str) -> String {
        CachePrefix::AccessToken.scoped_key(MANAGER_SCOPE, token)
    }

    /// 权限键：`{PERMISSION_LIST}_MANAGER_<userId>`
    pub fn permission_key(user_id: &str) -> String {
        CachePrefix::PermissionList.scoped_key(MANAGER_SCOPE, user_id)
    }
}

/// 管理端认证中间件
///
/// 未携带令牌的请求直接放行，由需要登录的处理器通过 [`AuthUser`] 提取器拒绝
pub async fn manager_auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AdminError> {
    let token = request
        .headers()
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from);

    let Some(token) = token else {
        return Ok(next.run(request).await);
    };

    let user = auth.jwt.decode_user(&token).map_err(|e| {
        match &e {
            AdminError::TokenExpired => debug!("令牌已过期"),
            other => error!(error = %other, "令牌解析失败"),
        }
        e
    })?;

    let session_alive = auth
        .cache
        .exists(&AuthState::session_key(&token))
        .await
        .map_err(|e| AdminError::Redis(e.to_string()))?;
    if !session_alive {
        return Err(AdminError::SessionExpired);
    }

    if !user.is_super {
        let path = request
            .extensions()
            .get::<OriginalUri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());

        let permissions = auth
            .cache
            .get::<UserPermissions>(&AuthState::permission_key(&user.id))
            .await
            .map_err(|e| AdminError::Redis(e.to_string()))?
            .unwrap_or_default();

        if !permissions.is_permitted(request.method(), &path) {
            warn!(user_id = %user.id, method = %request.method(), path = %path, "接口访问被拒绝");
            return Err(AdminError::NoPermission);
        }
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
