//! 分销服务错误类型
//!
//! 定义分销账本的业务错误和系统错误

use mall_shared::error::MallError;
use thiserror::Error;

/// 分销服务错误类型
#[derive(Debug, Error)]
pub enum DistributionError {
    // === 业务错误 ===
    #[error("订单不存在: {0}")]
    OrderNotFound(String),

    #[error("分销员不存在: {0}")]
    AffiliateNotFound(String),

    /// 存在带佣金的店铺流水却找不到对应佣金订单，属于数据不一致
    #[error("佣金订单缺失: order_item_sn={0}")]
    CommissionOrderMissing(String),

    #[error("分销设置无效: {0}")]
    InvalidSetting(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("缓存错误: {0}")]
    Cache(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 分销服务 Result 类型别名
pub type Result<T> = std::result::Result<T, DistributionError>;

impl DistributionError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Cache(_) | Self::Internal(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::AffiliateNotFound(_) => "AFFILIATE_NOT_FOUND",
            Self::CommissionOrderMissing(_) => "COMMISSION_ORDER_MISSING",
            Self::InvalidSetting(_) => "INVALID_SETTING",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<MallError> for DistributionError {
    fn from(err: MallError) -> Self {
        match err {
            MallError::Database(e) => Self::Database(e),
            MallError::Serialization(e) => Self::Serialization(e),
            MallError::Redis(e) => Self::Cache(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(DistributionError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(DistributionError::Cache("connection refused".to_string()).is_retryable());
        assert!(!DistributionError::OrderNotFound("O1".to_string()).is_retryable());
        assert!(!DistributionError::CommissionOrderMissing("I1".to_string()).is_retryable());
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(DistributionError::AffiliateNotFound("D1".to_string()).is_business_error());
        assert!(DistributionError::InvalidSetting("cashDay=-1".to_string()).is_business_error());
        assert!(!DistributionError::Internal("boom".to_string()).is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            DistributionError::OrderNotFound("O1".to_string()).error_code(),
            "ORDER_NOT_FOUND"
        );
        assert_eq!(
            DistributionError::CommissionOrderMissing("I1".to_string()).error_code(),
            "COMMISSION_ORDER_MISSING"
        );
    }

    #[test]
    fn test_from_mall_error() {
        let err: DistributionError = MallError::Validation("bad".to_string()).into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");

        let err: DistributionError = MallError::Database(sqlx::Error::RowNotFound).into();
        assert!(err.is_retryable());
    }
}
