//! 分销佣金订单

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::CommissionOrderStatus;
use super::order::TransactionLine;

/// 分销佣金订单
///
/// 每条带佣金的店铺流水对应一行，`order_item_sn` 唯一，用于售后退款匹配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommissionOrder {
    pub id: i64,
    pub order_sn: String,
    pub order_item_sn: String,
    pub affiliate_id: String,
    pub affiliate_name: String,
    pub store_id: String,
    pub store_name: String,
    pub member_id: String,
    pub member_name: String,
    pub goods_id: String,
    pub goods_name: String,
    pub image: Option<String>,
    pub num: i32,
    pub rebate_amount: Decimal,
    pub status: CommissionOrderStatus,
    /// 结算（解冻）时间
    pub settle_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的佣金订单
#[derive(Debug, Clone, PartialEq)]
pub struct NewCommissionOrder {
    pub order_sn: String,
    pub order_item_sn: String,
    pub affiliate_id: String,
    pub affiliate_name: String,
    pub store_id: String,
    pub store_name: String,
    pub member_id: String,
    pub member_name: String,
    pub goods_id: String,
    pub goods_name: String,
    pub image: Option<String>,
    pub num: i32,
    pub rebate_amount: Decimal,
    pub status: CommissionOrderStatus,
    pub settle_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl NewCommissionOrder {
    /// 由店铺流水构造待结算佣金订单
    pub fn from_line(
        line: &TransactionLine,
        affiliate_id: &str,
        affiliate_name: &str,
        now: DateTime<Utc>,
        settle_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_sn: line.order_sn.clone(),
            order_item_sn: line.order_item_sn.clone(),
            affiliate_id: affiliate_id.to_string(),
            affiliate_name: affiliate_name.to_string(),
            store_id: line.store_id.clone(),
            store_name: line.store_name.clone(),
            member_id: line.member_id.clone(),
            member_name: line.member_name.clone(),
            goods_id: line.goods_id.clone(),
            goods_name: line.goods_name.clone(),
            image: line.image.clone(),
            num: line.num,
            rebate_amount: line.rebate(),
            status: CommissionOrderStatus::WaitBill,
            settle_at,
            created_at: now,
        }
    }

    pub fn into_commission_order(self, id: i64) -> CommissionOrder {
        CommissionOrder {
            id,
            order_sn: self.order_sn,
            order_item_sn: self.order_item_sn,
            affiliate_id: self.affiliate_id,
            affiliate_name: self.affiliate_name,
            store_id: self.store_id,
            store_name: self.store_name,
            member_id: self.member_id,
            member_name: self.member_name,
            goods_id: self.goods_id,
            goods_name: self.goods_name,
            image: self.image,
            num: self.num,
            rebate_amount: self.rebate_amount,
            status: self.status,
            settle_at: self.settle_at,
            created_at: self.created_at,
        }
    }
}

/// 佣金订单分页查询条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionOrderFilter {
    pub affiliate_id: Option<String>,
    /// 分销员名称模糊匹配
    pub affiliate_name: Option<String>,
    pub store_id: Option<String>,
    pub status: Option<CommissionOrderStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl CommissionOrderFilter {
    /// 内存实现使用的匹配逻辑，与 SQL 条件保持一致
    pub fn matches(&self, order: &CommissionOrder) -> bool {
        self.affiliate_id
            .as_deref()
            .is_none_or(|id| order.affiliate_id == id)
            && self
                .affiliate_name
                .as_deref()
                .is_none_or(|name| order.affiliate_name.contains(name))
            && self
                .store_id
                .as_deref()
                .is_none_or(|id| order.store_id == id)
            && self.status.is_none_or(|s| order.status == s)
            && self.start_time.is_none_or(|t| order.created_at >= t)
            && self.end_time.is_none_or(|t| order.created_at <= t)
    }
}
