//! 分销服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};

/// 佣金订单状态
///
/// `WaitBill -> Settled` 由外部结算任务在 `settle_at` 之后推进，
/// 本服务只负责取消与退款相关的流转。`Cancelled` 为终态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionOrderStatus {
    /// 待结算 - 佣金已计入总额，尚未解冻
    #[default]
    WaitBill,
    /// 已结算
    Settled,
    /// 已取消
    Cancelled,
    /// 已退款
    Refund,
}

impl CommissionOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitBill => "WAIT_BILL",
            Self::Settled => "SETTLED",
            Self::Cancelled => "CANCELLED",
            Self::Refund => "REFUND",
        }
    }
}

impl std::fmt::Display for CommissionOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommissionOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAIT_BILL" => Ok(Self::WaitBill),
            "SETTLED" => Ok(Self::Settled),
            "CANCELLED" => Ok(Self::Cancelled),
            "REFUND" => Ok(Self::Refund),
            other => Err(format!("未知的佣金订单状态: {other}")),
        }
    }
}

/// 订单支付状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayStatus {
    #[default]
    Unpaid,
    Paid,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_status_serde() {
        assert_eq!(
            serde_json::to_string(&CommissionOrderStatus::WaitBill).unwrap(),
            "\"WAIT_BILL\""
        );
        let status: CommissionOrderStatus = serde_json::from_str("\"SETTLED\"").unwrap();
        assert_eq!(status, CommissionOrderStatus::Settled);
    }

    #[test]
    fn test_commission_status_from_str() {
        assert_eq!(
            "CANCELLED".parse::<CommissionOrderStatus>().unwrap(),
            CommissionOrderStatus::Cancelled
        );
        assert!("CANCEL".parse::<CommissionOrderStatus>().is_err());
        assert_eq!(CommissionOrderStatus::Refund.to_string(), "REFUND");
    }

    #[test]
    fn test_pay_status_serde() {
        let status: PayStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, PayStatus::Paid);
    }
}
