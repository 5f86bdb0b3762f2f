//! 中间件模块
//!
//! 提供管理端认证与接口权限校验

mod auth;
mod permission;

pub use auth::{ACCESS_TOKEN_HEADER, AuthState, manager_auth_middleware};
pub use permission::{UserPermissions, simple_match};
