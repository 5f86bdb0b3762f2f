//! 服务层数据传输对象

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CommissionOrder;

/// 订单支付处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayOrderOutcome {
    /// 订单未关联分销员
    NotDistributionOrder,
    /// 已生成佣金订单（无带佣金流水时 created 为 0）
    #[serde(rename_all = "camelCase")]
    Recorded { created: usize, total_rebate: Decimal },
}

/// 订单取消处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderOutcome {
    /// 被标记为已取消的佣金订单数
    pub cancelled_rows: u64,
    /// 回退的佣金总额（正数），未回退为 0
    pub reversed_rebate: Decimal,
}

/// 售后退款处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundOrderOutcome {
    /// 售后单未关联带佣金的流水
    NoCommission,
    /// 佣金订单已取消，无需处理
    AlreadyCancelled,
    /// 未结算佣金订单被作废
    #[serde(rename_all = "camelCase")]
    Voided { order_item_sn: String },
    /// 已结算佣金回退可提现金额，amount 为负数增量
    #[serde(rename_all = "camelCase")]
    WithdrawableReversed { affiliate_id: String, amount: Decimal },
}

/// 生命周期事件处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerOutcome {
    OrderPaid(PayOrderOutcome),
    OrderCancelled(CancelOrderOutcome),
    AfterSaleRefunded(RefundOrderOutcome),
}

/// 佣金订单分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionOrderPage {
    pub items: Vec<CommissionOrder>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
