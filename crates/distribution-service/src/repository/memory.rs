//! 内存分销账本存储
//!
//! 事务开启时复制一份数据快照，所有读写都作用在快照上，提交时整体替换共享状态；
//! 未提交就 drop 的事务不留下任何痕迹。用于测试和本地运行。
//!
//! 通过 [`FailPoint`] 可以让指定步骤返回错误，用于验证回滚行为。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use super::traits::{
    AffiliateDirectory, CommissionOrderQuery, CommissionOrderStore, LedgerStore,
    LedgerTransaction, OrderLookup, RebateAccount, TransactionLineLookup,
};
use crate::error::{DistributionError, Result};
use crate::models::{
    AffiliateAccount, CommissionOrder, CommissionOrderFilter, CommissionOrderStatus,
    NewCommissionOrder, Order, TransactionLine,
};

/// 余额调整记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceOperation {
    AddRebate { affiliate_id: String, amount: Decimal },
    SubtractWithdrawable { affiliate_id: String, amount: Decimal },
}

/// 故障注入点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertCommissionOrder,
    AddRebate,
    SubtractWithdrawable,
    UpdateStatus,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct LedgerData {
    orders: HashMap<String, Order>,
    lines: Vec<TransactionLine>,
    affiliates: HashMap<String, AffiliateAccount>,
    commission_orders: Vec<CommissionOrder>,
    next_commission_id: i64,
    operations: Vec<BalanceOperation>,
}

#[derive(Debug, Default)]
struct SharedState {
    data: LedgerData,
    fail_point: Option<FailPoint>,
}

/// 内存分销账本存储
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<SharedState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_order(&self, order: Order) {
        self.state.lock().data.orders.insert(order.sn.clone(), order);
    }

    pub fn insert_line(&self, line: TransactionLine) {
        self.state.lock().data.lines.push(line);
    }

    pub fn insert_affiliate(&self, affiliate: AffiliateAccount) {
        self.state
            .lock()
            .data
            .affiliates
            .insert(affiliate.id.clone(), affiliate);
    }

    /// 直接写入佣金订单（模拟历史数据）
    pub fn insert_commission_order(&self, order: NewCommissionOrder) -> i64 {
        let mut state = self.state.lock();
        state.data.next_commission_id += 1;
        let id = state.data.next_commission_id;
        state
            .data
            .commission_orders
            .push(order.into_commission_order(id));
        id
    }

    /// 直接修改佣金订单状态（模拟外部结算任务）
    pub fn set_commission_status(&self, order_item_sn: &str, status: CommissionOrderStatus) {
        let mut state = self.state.lock();
        for order in state
            .data
            .commission_orders
            .iter_mut()
            .filter(|o| o.order_item_sn == order_item_sn)
        {
            order.status = status;
        }
    }

    /// 将售后单号回填到流水（模拟售后子系统）
    pub fn mark_line_refunded(&self, order_item_sn: &str, refund_sn: &str) {
        let mut state = self.state.lock();
        for line in state
            .data
            .lines
            .iter_mut()
            .filter(|l| l.order_item_sn == order_item_sn)
        {
            line.refund_sn = Some(refund_sn.to_string());
        }
    }

    pub fn commission_orders(&self) -> Vec<CommissionOrder> {
        self.state.lock().data.commission_orders.clone()
    }

    pub fn commission_orders_by_order(&self, order_sn: &str) -> Vec<CommissionOrder> {
        self.state
            .lock()
            .data
            .commission_orders
            .iter()
            .filter(|o| o.order_sn == order_sn)
            .cloned()
            .collect()
    }

    pub fn affiliate(&self, affiliate_id: &str) -> Option<AffiliateAccount> {
        self.state.lock().data.affiliates.get(affiliate_id).cloned()
    }

    /// 已提交的余额调整记录
    pub fn balance_operations(&self) -> Vec<BalanceOperation> {
        self.state.lock().data.operations.clone()
    }

    pub fn fail_on(&self, point: FailPoint) {
        self.state.lock().fail_point = Some(point);
    }

    pub fn clear_fail_point(&self) {
        self.state.lock().fail_point = None;
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let state = self.state.lock();
        Ok(Box::new(MemoryLedgerTransaction {
            shared: Arc::clone(&self.state),
            working: state.data.clone(),
            fail_point: state.fail_point,
        }))
    }
}

#[async_trait]
impl CommissionOrderQuery for MemoryLedgerStore {
    async fn page(
        &self,
        filter: &CommissionOrderFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<CommissionOrder>, i64)> {
        let mut matched: Vec<CommissionOrder> = self
            .state
            .lock()
            .data
            .commission_orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((items, total))
    }
}

/// 内存事务
pub struct MemoryLedgerTransaction {
    shared: Arc<Mutex<SharedState>>,
    working: LedgerData,
    fail_point: Option<FailPoint>,
}

impl MemoryLedgerTransaction {
    fn check(&self, point: FailPoint) -> Result<()> {
        if self.fail_point == Some(point) {
            return Err(DistributionError::Internal(format!("注入故障: {point:?}")));
        }
        Ok(())
    }

    fn affiliate_mut(&mut self, affiliate_id: &str) -> Result<&mut AffiliateAccount> {
        self.working
            .affiliates
            .get_mut(affiliate_id)
            .ok_or_else(|| DistributionError::AffiliateNotFound(affiliate_id.to_string()))
    }

    fn update_status_where<F>(&mut self, status: CommissionOrderStatus, predicate: F) -> Result<u64>
    where
        F: Fn(&CommissionOrder) -> bool,
    {
        self.check(FailPoint::UpdateStatus)?;
        let mut affected = 0;
        for order in self
            .working
            .commission_orders
            .iter_mut()
            .filter(|o| predicate(o))
        {
            order.status = status;
            affected += 1;
        }
        Ok(affected)
    }
}

#[async_trait]
impl OrderLookup for MemoryLedgerTransaction {
    async fn get_order_by_sn(&mut self, order_sn: &str) -> Result<Option<Order>> {
        Ok(self.working.orders.get(order_sn).cloned())
    }
}

#[async_trait]
impl TransactionLineLookup for MemoryLedgerTransaction {
    async fn list_rebate_lines_by_order(
        &mut self,
        order_sn: &str,
    ) -> Result<Vec<TransactionLine>> {
        Ok(self
            .working
            .lines
            .iter()
            .filter(|l| l.order_sn == order_sn && l.distribution_rebate.is_some())
            .cloned()
            .collect())
    }

    async fn find_rebate_line_by_refund_sn(
        &mut self,
        refund_sn: &str,
    ) -> Result<Option<TransactionLine>> {
        Ok(self
            .working
            .lines
            .iter()
            .find(|l| l.refund_sn.as_deref() == Some(refund_sn) && l.distribution_rebate.is_some())
            .cloned())
    }
}

#[async_trait]
impl AffiliateDirectory for MemoryLedgerTransaction {
    async fn get_affiliate(&mut self, affiliate_id: &str) -> Result<Option<AffiliateAccount>> {
        Ok(self.working.affiliates.get(affiliate_id).cloned())
    }
}

#[async_trait]
impl RebateAccount for MemoryLedgerTransaction {
    async fn add_rebate(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()> {
        self.check(FailPoint::AddRebate)?;
        let affiliate = self.affiliate_mut(affiliate_id)?;
        affiliate.rebate_total += amount;
        affiliate.withdrawable_rebate += amount;
        self.working.operations.push(BalanceOperation::AddRebate {
            affiliate_id: affiliate_id.to_string(),
            amount,
        });
        Ok(())
    }

    async fn subtract_withdrawable(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()> {
        self.check(FailPoint::SubtractWithdrawable)?;
        let affiliate = self.affiliate_mut(affiliate_id)?;
        affiliate.withdrawable_rebate += amount;
        self.working
            .operations
            .push(BalanceOperation::SubtractWithdrawable {
                affiliate_id: affiliate_id.to_string(),
                amount,
            });
        Ok(())
    }
}

#[async_trait]
impl CommissionOrderStore for MemoryLedgerTransaction {
    async fn insert_commission_order(&mut self, order: &NewCommissionOrder) -> Result<i64> {
        self.check(FailPoint::InsertCommissionOrder)?;
        if self
            .working
            .commission_orders
            .iter()
            .any(|o| o.order_item_sn == order.order_item_sn)
        {
            return Err(DistributionError::Internal(format!(
                "order_item_sn 重复: {}",
                order.order_item_sn
            )));
        }

        self.working.next_commission_id += 1;
        let id = self.working.next_commission_id;
        self.working
            .commission_orders
            .push(order.clone().into_commission_order(id));
        Ok(id)
    }

    async fn list_commission_orders_by_order_sn(
        &mut self,
        order_sn: &str,
    ) -> Result<Vec<CommissionOrder>> {
        Ok(self
            .working
            .commission_orders
            .iter()
            .filter(|o| o.order_sn == order_sn)
            .cloned()
            .collect())
    }

    async fn find_commission_order_by_item_sn(
        &mut self,
        order_item_sn: &str,
    ) -> Result<Option<CommissionOrder>> {
        Ok(self
            .working
            .commission_orders
            .iter()
            .find(|o| o.order_item_sn == order_item_sn)
            .cloned())
    }

    async fn update_status_by_order_sn(
        &mut self,
        order_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        self.update_status_where(status, |o| o.order_sn == order_sn)
    }

    async fn update_status_by_order_item_sn(
        &mut self,
        order_item_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        self.update_status_where(status, |o| o.order_item_sn == order_item_sn)
    }
}

#[async_trait]
impl LedgerTransaction for MemoryLedgerTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.check(FailPoint::Commit)?;
        let this = *self;
        this.shared.lock().data = this.working;
        Ok(())
    }
}
