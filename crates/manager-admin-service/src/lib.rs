//! 商城管理端服务
//!
//! 提供管理员认证鉴权、会员统计与分销佣金订单查询等 REST API。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 解析与登录用户上下文
//! - `middleware`: 令牌校验、会话校验与接口权限过滤
//! - `statistics`: 会员统计
//! - `dto`: 请求和响应的数据传输对象
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod statistics;

pub use auth::{AuthUser, JwtConfig, JwtManager};
pub use error::{AdminError, Result};
pub use state::AppState;
