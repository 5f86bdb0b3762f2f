//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{Router, middleware, routing::get};
use mall_shared::observability::middleware as obs_middleware;

use crate::{handlers, middleware::manager_auth_middleware, state::AppState};

/// API 前缀
pub const API_PREFIX: &str = "/api/manager";

/// 会员统计路由
fn statistics_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/statistics/member",
            get(handlers::member_stats::member_statistics),
        )
        .route(
            "/statistics/member/overview",
            get(handlers::member_stats::member_overview),
        )
        .route(
            "/statistics/member/summary",
            get(handlers::member_stats::member_range_summary),
        )
}

/// 分销路由
fn distribution_routes() -> Router<AppState> {
    Router::new().route(
        "/distribution/orders",
        get(handlers::distribution_order::list_commission_orders),
    )
}

/// 管理端业务路由（未挂载前缀与中间件）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(statistics_routes())
        .merge(distribution_routes())
}

/// 组装带认证与可观测性中间件的应用路由
///
/// 认证中间件只作用于 [`API_PREFIX`] 下的路由，探针等路由由调用方另行挂载
pub fn build_router(state: AppState) -> Router {
    let api = api_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        manager_auth_middleware,
    ));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
