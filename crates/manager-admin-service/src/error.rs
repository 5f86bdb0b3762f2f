//! 管理端错误类型定义
//!
//! 包含认证、鉴权与查询接口的错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use distribution::DistributionError;
use mall_shared::error::MallError;
use serde_json::json;

/// 管理端错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("登录凭证已过期")]
    TokenExpired,
    #[error("抱歉，您没有访问权限")]
    NoPermission,
    #[error("登录已失效，请重新登录")]
    SessionExpired,
    #[error("禁止访问: {0}")]
    Forbidden(String),

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Redis错误: {0}")]
    Redis(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::TokenExpired | Self::NoPermission => {
                StatusCode::UNAUTHORIZED
            }
            Self::SessionExpired | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Redis(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::NoPermission => "NO_PERMISSION",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Redis(_) => "REDIS_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Redis(e) => {
                tracing::error!(error = %e, "Redis 操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 从 JSON 序列化错误转换
impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON 处理错误: {}", err))
    }
}

/// 从基础设施错误转换
impl From<MallError> for AdminError {
    fn from(err: MallError) -> Self {
        match err {
            MallError::Database(e) => Self::Database(e),
            MallError::Redis(e) => Self::Redis(e.to_string()),
            MallError::NotFound { entity, id } => Self::NotFound(format!("{entity} id={id}")),
            MallError::Validation(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 从分销服务错误转换
impl From<DistributionError> for AdminError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::Database(e) => Self::Database(e),
            DistributionError::OrderNotFound(sn) => Self::NotFound(format!("订单 {sn}")),
            DistributionError::AffiliateNotFound(id) => Self::NotFound(format!("分销员 {id}")),
            DistributionError::InvalidSetting(msg) => Self::Validation(msg),
            DistributionError::Cache(msg) => Self::Redis(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(AdminError, StatusCode, &'static str)> {
        vec![
            (AdminError::Unauthorized("缺少用户信息".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (AdminError::TokenExpired, StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            (AdminError::NoPermission, StatusCode::UNAUTHORIZED, "NO_PERMISSION"),
            (AdminError::SessionExpired, StatusCode::FORBIDDEN, "SESSION_EXPIRED"),
            (AdminError::Forbidden("read only".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (AdminError::Validation("month 超出范围".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (AdminError::NotFound("订单 SN1".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AdminError::Redis("connection refused".into()), StatusCode::INTERNAL_SERVER_ERROR, "REDIS_ERROR"),
            (AdminError::Internal("unexpected state".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_and_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    /// 过滤器的两条固定提示语是前端契约
    #[test]
    fn test_auth_messages() {
        assert_eq!(AdminError::NoPermission.to_string(), "抱歉，您没有访问权限");
        assert_eq!(AdminError::SessionExpired.to_string(), "登录已失效，请重新登录");
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false));
            assert_eq!(body["code"], json!(expected_code));
            assert!(!body["message"].as_str().unwrap_or("").is_empty());
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let system_errors: Vec<(AdminError, &str)> = vec![
            (AdminError::Redis("redis://10.0.0.1:6379 connection refused".into()), "redis://10.0.0.1:6379"),
            (AdminError::Internal("stack overflow at module X".into()), "stack overflow"),
        ];

        for (error, leaked_detail) in system_errors {
            let response = error.into_response();
            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            let message = body["message"].as_str().unwrap();

            assert!(!message.contains(leaked_detail));
            assert!(message.contains("服务内部错误"));
        }
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add("month", ValidationError::new("range"));

        let admin_error: AdminError = errors.into();
        match &admin_error {
            AdminError::Validation(msg) => assert!(msg.contains("month")),
            other => panic!("期望 Validation 变体，实际: {:?}", other),
        }
    }

    #[test]
    fn test_from_distribution_error() {
        let err: AdminError = DistributionError::OrderNotFound("SN100".into()).into();
        assert!(matches!(&err, AdminError::NotFound(msg) if msg.contains("SN100")));

        let err: AdminError = DistributionError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");

        let err: AdminError = DistributionError::CommissionOrderMissing("I1".into()).into();
        assert!(matches!(err, AdminError::Internal(_)));
    }

    #[test]
    fn test_from_mall_error() {
        let err: AdminError = MallError::Validation("bad".into()).into();
        assert!(matches!(err, AdminError::Validation(_)));

        let err: AdminError = MallError::Internal("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
