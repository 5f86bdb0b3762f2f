//! 分销员账户

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分销员账户
///
/// 余额只能通过 [`RebateAccount`](crate::repository::RebateAccount) 增减
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateAccount {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    /// 累计佣金
    pub rebate_total: Decimal,
    /// 可提现佣金
    pub withdrawable_rebate: Decimal,
    pub updated_at: DateTime<Utc>,
}
