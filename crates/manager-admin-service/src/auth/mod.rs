//! 认证模块
//!
//! 提供 JWT Token 生成、验证以及登录用户上下文

mod auth_user;
mod jwt;

pub use auth_user::{AuthUser, UserRole};
pub use jwt::{Claims, JwtConfig, JwtManager};
