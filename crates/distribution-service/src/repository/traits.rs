//! 仓储 Trait 定义
//!
//! 分销账本依赖的协作方被拆成若干窄能力接口，全部在同一个事务
//! （[`LedgerTransaction`]）上调用。分销员余额只能通过 [`RebateAccount`] 调整。

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{
    AffiliateAccount, CommissionOrder, CommissionOrderFilter, CommissionOrderStatus,
    DistributionSetting, NewCommissionOrder, Order, TransactionLine,
};

/// 订单查询
#[async_trait]
pub trait OrderLookup: Send {
    async fn get_order_by_sn(&mut self, order_sn: &str) -> Result<Option<Order>>;
}

/// 店铺流水查询（只返回佣金不为空的流水）
#[async_trait]
pub trait TransactionLineLookup: Send {
    async fn list_rebate_lines_by_order(&mut self, order_sn: &str)
    -> Result<Vec<TransactionLine>>;
    async fn find_rebate_line_by_refund_sn(
        &mut self,
        refund_sn: &str,
    ) -> Result<Option<TransactionLine>>;
}

/// 分销员查询
#[async_trait]
pub trait AffiliateDirectory: Send {
    async fn get_affiliate(&mut self, affiliate_id: &str) -> Result<Option<AffiliateAccount>>;
}

/// 分销员余额调整能力
///
/// 金额均为带符号的增量，负数表示回退
#[async_trait]
pub trait RebateAccount: Send {
    /// 同时调整累计佣金和可提现佣金
    async fn add_rebate(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()>;
    /// 只调整可提现佣金
    async fn subtract_withdrawable(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()>;
}

/// 佣金订单读写
#[async_trait]
pub trait CommissionOrderStore: Send {
    async fn insert_commission_order(&mut self, order: &NewCommissionOrder) -> Result<i64>;
    async fn list_commission_orders_by_order_sn(
        &mut self,
        order_sn: &str,
    ) -> Result<Vec<CommissionOrder>>;
    async fn find_commission_order_by_item_sn(
        &mut self,
        order_item_sn: &str,
    ) -> Result<Option<CommissionOrder>>;
    /// 返回受影响行数
    async fn update_status_by_order_sn(
        &mut self,
        order_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64>;
    async fn update_status_by_order_item_sn(
        &mut self,
        order_item_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64>;
}

/// 分销账本事务
///
/// 未调用 [`commit`](LedgerTransaction::commit) 就被 drop 时，所有写入回滚
#[async_trait]
pub trait LedgerTransaction:
    OrderLookup + TransactionLineLookup + AffiliateDirectory + RebateAccount + CommissionOrderStore
{
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// 分销账本存储，负责开启事务
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>>;
}

/// 系统设置读取
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingProvider: Send + Sync {
    async fn distribution_setting(&self) -> Result<DistributionSetting>;
}

/// 佣金订单分页查询（管理端）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommissionOrderQuery: Send + Sync {
    /// 按创建时间倒序返回 (当前页数据, 总数)
    async fn page(
        &self,
        filter: &CommissionOrderFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<CommissionOrder>, i64)>;
}
