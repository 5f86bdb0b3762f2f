//! 商城管理端服务
//!
//! 提供会员统计、分销佣金订单查询等 REST API。

use std::sync::Arc;

use axum::{Json, http::HeaderValue, routing::get};
use distribution::CommissionOrderRepository;
use mall_shared::{cache::Cache, config::AppConfig, database::Database, observability};
use manager_admin::{
    AppState,
    auth::{JwtConfig, JwtManager},
    middleware::AuthState,
    routes,
    statistics::PgMemberStatisticsStore,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "manager-admin-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_default();

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting {} on {}", SERVICE_NAME, config.server_addr());

    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;
    let cache = Arc::new(Cache::new(&config.redis)?);

    // 生产环境必须通过环境变量注入密钥
    let jwt_secret = match std::env::var("MALL_JWT_SECRET") {
        Ok(secret) => secret,
        Err(_) if config.is_production() => {
            anyhow::bail!("MALL_JWT_SECRET must be set in production environment");
        }
        Err(_) => {
            warn!("Using default JWT secret - set MALL_JWT_SECRET for production");
            JwtConfig::default().secret
        }
    };

    let jwt_expires = std::env::var("MALL_JWT_EXPIRES_SECS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(86400);

    let jwt = JwtManager::new(JwtConfig {
        secret: jwt_secret,
        expires_in_secs: jwt_expires,
        ..Default::default()
    });

    let state = AppState::new(
        AuthState::new(Arc::new(jwt), cache.clone()),
        Arc::new(PgMemberStatisticsStore::new(db.pool().clone())),
        Arc::new(CommissionOrderRepository::new(db.pool().clone())),
    );

    let allowed_origins = std::env::var("MALL_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3001,http://localhost:5173".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("MALL_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = routes::build_router(state)
        .route("/health", get(health_check))
        .route(
            "/ready",
            get({
                let db = db.clone();
                let cache = cache.clone();
                move || readiness_check(db.clone(), cache.clone())
            }),
        )
        .layer(cors);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针：检查数据库和 Redis 连接是否可用
async fn readiness_check(db: Database, cache: Arc<Cache>) -> Json<serde_json::Value> {
    let db_ok = db.health_check().await.is_ok();
    let cache_ok = cache.health_check().await.is_ok();
    let all_ok = db_ok && cache_ok;

    Json(serde_json::json!({
        "status": if all_ok { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "checks": {
            "database": if db_ok { "ok" } else { "fail" },
            "redis": if cache_ok { "ok" } else { "fail" }
        }
    }))
}
