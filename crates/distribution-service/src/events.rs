//! 订单生命周期事件
//!
//! 订单与售后子系统通过消息通知分销账本，事件 JSON 形如
//! `{"type": "ORDER_PAID", "orderSn": "O1"}`。

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 订单生命周期事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderLifecycleEvent {
    #[serde(rename_all = "camelCase")]
    OrderPaid { order_sn: String },
    #[serde(rename_all = "camelCase")]
    OrderCancelled { order_sn: String },
    #[serde(rename_all = "camelCase")]
    AfterSaleRefunded { after_sale_sn: String },
}

impl OrderLifecycleEvent {
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// 用于日志和指标标签
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderPaid { .. } => "order_paid",
            Self::OrderCancelled { .. } => "order_cancelled",
            Self::AfterSaleRefunded { .. } => "after_sale_refunded",
        }
    }

    /// 事件关联的单号
    pub fn reference(&self) -> &str {
        match self {
            Self::OrderPaid { order_sn } | Self::OrderCancelled { order_sn } => order_sn,
            Self::AfterSaleRefunded { after_sale_sn } => after_sale_sn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let event = OrderLifecycleEvent::from_json(r#"{"type":"ORDER_PAID","orderSn":"O1"}"#).unwrap();
        assert_eq!(
            event,
            OrderLifecycleEvent::OrderPaid {
                order_sn: "O1".to_string()
            }
        );
        assert_eq!(event.name(), "order_paid");

        let event = OrderLifecycleEvent::from_json(
            r#"{"type":"AFTER_SALE_REFUNDED","afterSaleSn":"AS1"}"#,
        )
        .unwrap();
        assert_eq!(event.reference(), "AS1");
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(OrderLifecycleEvent::from_json(r#"{"type":"ORDER_SHIPPED","orderSn":"O1"}"#).is_err());
        assert!(OrderLifecycleEvent::from_json(r#"{"type":"ORDER_PAID"}"#).is_err());
    }
}
