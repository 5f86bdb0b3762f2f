//! 订单与店铺流水
//!
//! 由订单子系统维护，分销账本只读取

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::PayStatus;

/// 订单
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub sn: String,
    pub member_id: String,
    pub store_id: String,
    /// 关联的分销员，非分销订单为 None
    #[sqlx(rename = "distribution_id")]
    pub affiliate_id: Option<String>,
    pub pay_status: PayStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// 是否为已支付的分销订单
    pub fn is_paid_distribution_order(&self) -> bool {
        self.affiliate_id.is_some() && self.pay_status == PayStatus::Paid
    }
}

/// 店铺流水（订单项粒度）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub order_sn: String,
    pub order_item_sn: String,
    /// 售后单号，退款后回填
    pub refund_sn: Option<String>,
    pub store_id: String,
    pub store_name: String,
    pub member_id: String,
    pub member_name: String,
    pub goods_id: String,
    pub goods_name: String,
    pub image: Option<String>,
    pub num: i32,
    /// 分销佣金，非分销商品为 None
    pub distribution_rebate: Option<Decimal>,
}

impl TransactionLine {
    /// 佣金金额，未设置时为 0
    pub fn rebate(&self) -> Decimal {
        self.distribution_rebate.unwrap_or(Decimal::ZERO)
    }
}
