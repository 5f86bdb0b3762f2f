//! PostgreSQL 分销账本存储
//!
//! 每次 [`LedgerStore::begin`] 开启一个数据库事务，能力接口全部委托给各仓储的
//! `_in_tx` 函数。事务对象被 drop 而未提交时由 sqlx 自动回滚。

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::affiliate_repo::AffiliateRepository;
use super::commission_order_repo::CommissionOrderRepository;
use super::order_repo::OrderRepository;
use super::traits::{
    AffiliateDirectory, CommissionOrderStore, LedgerStore, LedgerTransaction, OrderLookup,
    RebateAccount, TransactionLineLookup,
};
use super::transaction_line_repo::TransactionLineRepository;
use crate::error::Result;
use crate::models::{
    AffiliateAccount, CommissionOrder, CommissionOrderStatus, NewCommissionOrder, Order,
    TransactionLine,
};

/// PostgreSQL 分销账本存储
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgLedgerTransaction { tx }))
    }
}

/// PostgreSQL 事务
pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderLookup for PgLedgerTransaction {
    async fn get_order_by_sn(&mut self, order_sn: &str) -> Result<Option<Order>> {
        OrderRepository::get_by_sn_in_tx(&mut *self.tx, order_sn).await
    }
}

#[async_trait]
impl TransactionLineLookup for PgLedgerTransaction {
    async fn list_rebate_lines_by_order(
        &mut self,
        order_sn: &str,
    ) -> Result<Vec<TransactionLine>> {
        TransactionLineRepository::list_rebate_lines_by_order_in_tx(&mut *self.tx, order_sn).await
    }

    async fn find_rebate_line_by_refund_sn(
        &mut self,
        refund_sn: &str,
    ) -> Result<Option<TransactionLine>> {
        TransactionLineRepository::find_rebate_line_by_refund_sn_in_tx(&mut *self.tx, refund_sn)
            .await
    }
}

#[async_trait]
impl AffiliateDirectory for PgLedgerTransaction {
    async fn get_affiliate(&mut self, affiliate_id: &str) -> Result<Option<AffiliateAccount>> {
        AffiliateRepository::get_in_tx(&mut *self.tx, affiliate_id).await
    }
}

#[async_trait]
impl RebateAccount for PgLedgerTransaction {
    async fn add_rebate(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()> {
        AffiliateRepository::add_rebate_in_tx(&mut *self.tx, amount, affiliate_id).await
    }

    async fn subtract_withdrawable(&mut self, amount: Decimal, affiliate_id: &str) -> Result<()> {
        AffiliateRepository::subtract_withdrawable_in_tx(&mut *self.tx, amount, affiliate_id).await
    }
}

#[async_trait]
impl CommissionOrderStore for PgLedgerTransaction {
    async fn insert_commission_order(&mut self, order: &NewCommissionOrder) -> Result<i64> {
        CommissionOrderRepository::create_in_tx(&mut *self.tx, order).await
    }

    async fn list_commission_orders_by_order_sn(
        &mut self,
        order_sn: &str,
    ) -> Result<Vec<CommissionOrder>> {
        CommissionOrderRepository::list_by_order_sn_in_tx(&mut *self.tx, order_sn).await
    }

    async fn find_commission_order_by_item_sn(
        &mut self,
        order_item_sn: &str,
    ) -> Result<Option<CommissionOrder>> {
        CommissionOrderRepository::find_by_order_item_sn_in_tx(&mut *self.tx, order_item_sn).await
    }

    async fn update_status_by_order_sn(
        &mut self,
        order_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        CommissionOrderRepository::update_status_by_order_sn_in_tx(&mut *self.tx, order_sn, status)
            .await
    }

    async fn update_status_by_order_item_sn(
        &mut self,
        order_item_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        CommissionOrderRepository::update_status_by_order_item_sn_in_tx(
            &mut *self.tx,
            order_item_sn,
            status,
        )
        .await
    }
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
