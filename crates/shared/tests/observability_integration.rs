//! 可观测性模块集成测试
//!
//! 测试 metrics、middleware 与配置的核心功能。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use mall_shared::observability::metrics::{
        record_commission_orders, record_distribution_event, record_http_request,
        record_rebate_adjustment,
    };

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/manager/statistics/member", 200, 0.05);
        record_http_request("GET", "/api/manager/distribution/orders", 401, 0.01);
        record_http_request("POST", "/api/manager/statistics/member", 405, 0.01);
        record_http_request("GET", "/api/manager/statistics/member/summary", 500, 0.25);
    }

    #[test]
    fn test_record_distribution_metrics() {
        record_distribution_event("ORDER_PAID", "recorded", 0.02);
        record_distribution_event("ORDER_CANCELLED", "cancelled", 0.01);
        record_distribution_event("AFTER_SALE_REFUNDED", "error", 0.03);
        record_commission_orders(0);
        record_commission_orders(3);
        record_rebate_adjustment("add_rebate");
        record_rebate_adjustment("reverse_rebate");
        record_rebate_adjustment("reverse_withdrawable");
    }
}

// ============================================================================
// HTTP 中间件测试
// ============================================================================

mod middleware_tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use mall_shared::observability::middleware::{RequestId, http_tracing, request_id};
    use tower::ServiceExt;

    async fn echo_request_id(Extension(id): Extension<RequestId>) -> String {
        id.as_str().to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo_request_id))
            .route("/fail", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn test_request_id_propagated_from_header() {
        let request = Request::builder()
            .uri("/echo")
            .header("x-request-id", "trace-001")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-001");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"trace-001");
    }

    #[tokio::test]
    async fn test_request_id_generated_when_absent() {
        let request = Request::builder().uri("/echo").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        let header = response
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        assert!(uuid::Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn test_tracing_preserves_status() {
        let request = Request::builder().uri("/fail").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_id_debug() {
        let id = RequestId("debug-test".to_string());
        assert!(format!("{:?}", id).contains("debug-test"));
    }
}

// ============================================================================
// 配置测试
// ============================================================================

mod config_tests {
    use mall_shared::observability::{ObservabilityConfig, ObservabilityGuard};

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert!(config.metrics_enabled);
        assert_eq!(config.metrics_port, 9090);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"json_logs": true, "metrics_enabled": false}"#).unwrap();
        assert!(config.json_logs);
        assert!(!config.metrics_enabled);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_empty_guard_drop() {
        let guard = ObservabilityGuard::empty();
        drop(guard);
    }
}
