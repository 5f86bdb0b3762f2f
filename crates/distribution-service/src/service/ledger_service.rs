//! 分销佣金账本服务
//!
//! 由订单与售后子系统驱动的三个入口：
//! - 订单支付：为每条带佣金的店铺流水生成待结算佣金订单，汇总后一次性累加分销员佣金
//! - 订单取消：已支付的分销订单回退佣金，随后取消该订单下全部佣金订单
//! - 售后退款：按佣金订单状态作废或回退可提现金额
//!
//! 每个入口在单个事务内完成，任何一步失败都不会留下部分写入。
//! 同一订单的支付与取消事件并发到达时没有额外加锁。

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use mall_shared::observability::metrics;

use crate::error::{DistributionError, Result};
use crate::events::OrderLifecycleEvent;
use crate::models::{CommissionOrderStatus, NewCommissionOrder};
use crate::repository::{
    AffiliateDirectory, CommissionOrderStore, LedgerStore, LedgerTransaction, OrderLookup,
    RebateAccount, SettingProvider, TransactionLineLookup,
};
use crate::service::dto::{CancelOrderOutcome, LedgerOutcome, PayOrderOutcome, RefundOrderOutcome};

/// 分销佣金账本服务
pub struct DistributionOrderService<S, P>
where
    S: LedgerStore + ?Sized,
    P: SettingProvider + ?Sized,
{
    store: Arc<S>,
    settings: Arc<P>,
}

impl<S, P> DistributionOrderService<S, P>
where
    S: LedgerStore + ?Sized,
    P: SettingProvider + ?Sized,
{
    pub fn new(store: Arc<S>, settings: Arc<P>) -> Self {
        Self { store, settings }
    }

    /// 订单支付
    ///
    /// 1. 查询订单，不存在则报错
    /// 2. 非分销订单直接返回
    /// 3. 逐条写入带佣金流水对应的待结算佣金订单
    /// 4. 佣金合计不为 0 时累加分销员佣金（只调用一次）
    #[instrument(skip(self))]
    pub async fn on_order_paid(&self, order_sn: &str) -> Result<PayOrderOutcome> {
        let mut tx = self.store.begin().await?;

        let order = tx
            .get_order_by_sn(order_sn)
            .await?
            .ok_or_else(|| DistributionError::OrderNotFound(order_sn.to_string()))?;

        let Some(affiliate_id) = order.affiliate_id.as_deref() else {
            debug!("非分销订单，跳过");
            return Ok(PayOrderOutcome::NotDistributionOrder);
        };

        let lines = tx.list_rebate_lines_by_order(order_sn).await?;
        if lines.is_empty() {
            debug!(affiliate_id, "订单无分销商品");
            return Ok(PayOrderOutcome::Recorded {
                created: 0,
                total_rebate: Decimal::ZERO,
            });
        }

        let affiliate = tx
            .get_affiliate(affiliate_id)
            .await?
            .ok_or_else(|| DistributionError::AffiliateNotFound(affiliate_id.to_string()))?;
        let setting = self.settings.distribution_setting().await?;

        let now = Utc::now();
        let settle_at = setting.settle_at(now)?;

        let mut total_rebate = Decimal::ZERO;
        for line in &lines {
            total_rebate += line.rebate();
            let commission = NewCommissionOrder::from_line(
                line,
                affiliate_id,
                &affiliate.member_name,
                now,
                settle_at,
            );
            tx.insert_commission_order(&commission).await?;
        }

        if !total_rebate.is_zero() {
            tx.add_rebate(total_rebate, affiliate_id).await?;
        }

        tx.commit().await?;

        metrics::record_commission_orders(lines.len() as u64);
        if !total_rebate.is_zero() {
            metrics::record_rebate_adjustment("add_rebate");
        }
        info!(
            affiliate_id,
            created = lines.len(),
            total_rebate = %total_rebate,
            cash_day = setting.cash_day,
            "分销佣金订单已生成"
        );

        Ok(PayOrderOutcome::Recorded {
            created: lines.len(),
            total_rebate,
        })
    }

    /// 订单取消
    ///
    /// 已支付的分销订单先回退佣金合计，再将该订单下所有佣金订单标记为已取消，
    /// 两步在同一事务内提交。状态更新不受回退条件影响。
    #[instrument(skip(self))]
    pub async fn on_order_cancelled(&self, order_sn: &str) -> Result<CancelOrderOutcome> {
        let mut tx = self.store.begin().await?;

        let order = tx
            .get_order_by_sn(order_sn)
            .await?
            .ok_or_else(|| DistributionError::OrderNotFound(order_sn.to_string()))?;

        let mut reversed_rebate = Decimal::ZERO;
        if let Some(affiliate_id) = order
            .affiliate_id
            .as_deref()
            .filter(|_| order.is_paid_distribution_order())
        {
            // 已作废的行同样计入，售后作废时并未回退余额
            let rebate: Decimal = tx
                .list_commission_orders_by_order_sn(order_sn)
                .await?
                .iter()
                .map(|c| c.rebate_amount)
                .sum();

            if !rebate.is_zero() {
                tx.add_rebate(-rebate, affiliate_id).await?;
                reversed_rebate = rebate;
            }
        }

        let cancelled_rows = tx
            .update_status_by_order_sn(order_sn, CommissionOrderStatus::Cancelled)
            .await?;

        tx.commit().await?;

        if !reversed_rebate.is_zero() {
            metrics::record_rebate_adjustment("reverse_rebate");
        }
        info!(
            cancelled_rows,
            reversed_rebate = %reversed_rebate,
            "分销佣金订单已取消"
        );

        Ok(CancelOrderOutcome {
            cancelled_rows,
            reversed_rebate,
        })
    }

    /// 售后退款
    ///
    /// | 佣金订单状态 | 处理 |
    /// |---|---|
    /// | 已取消 | 无操作 |
    /// | 待结算 | 标记为已取消，不调整余额 |
    /// | 已结算 / 已退款 | 回退可提现金额，状态不变 |
    #[instrument(skip(self))]
    pub async fn on_refund(&self, after_sale_sn: &str) -> Result<RefundOrderOutcome> {
        let mut tx = self.store.begin().await?;

        let Some(line) = tx.find_rebate_line_by_refund_sn(after_sale_sn).await? else {
            debug!("售后单未关联分销佣金");
            return Ok(RefundOrderOutcome::NoCommission);
        };

        let Some(commission) = tx
            .find_commission_order_by_item_sn(&line.order_item_sn)
            .await?
        else {
            error!(
                order_item_sn = %line.order_item_sn,
                "带佣金的流水没有对应的佣金订单"
            );
            return Err(DistributionError::CommissionOrderMissing(line.order_item_sn));
        };

        let outcome = match commission.status {
            CommissionOrderStatus::Cancelled => {
                debug!(order_item_sn = %line.order_item_sn, "佣金订单已取消");
                return Ok(RefundOrderOutcome::AlreadyCancelled);
            }
            CommissionOrderStatus::WaitBill => {
                tx.update_status_by_order_item_sn(
                    &line.order_item_sn,
                    CommissionOrderStatus::Cancelled,
                )
                .await?;
                RefundOrderOutcome::Voided {
                    order_item_sn: line.order_item_sn.clone(),
                }
            }
            CommissionOrderStatus::Settled | CommissionOrderStatus::Refund => {
                let amount = -line.rebate();
                tx.subtract_withdrawable(amount, &commission.affiliate_id)
                    .await?;
                RefundOrderOutcome::WithdrawableReversed {
                    affiliate_id: commission.affiliate_id.clone(),
                    amount,
                }
            }
        };

        tx.commit().await?;

        if matches!(outcome, RefundOrderOutcome::WithdrawableReversed { .. }) {
            metrics::record_rebate_adjustment("reverse_withdrawable");
        }
        info!(
            order_item_sn = %line.order_item_sn,
            status = %commission.status,
            ?outcome,
            "售后退款佣金已处理"
        );

        Ok(outcome)
    }

    /// 按事件类型分发
    #[instrument(skip(self, event), fields(event = event.name(), reference = event.reference()))]
    pub async fn handle_event(&self, event: &OrderLifecycleEvent) -> Result<LedgerOutcome> {
        let start = Instant::now();

        let result = match event {
            OrderLifecycleEvent::OrderPaid { order_sn } => {
                self.on_order_paid(order_sn).await.map(LedgerOutcome::OrderPaid)
            }
            OrderLifecycleEvent::OrderCancelled { order_sn } => self
                .on_order_cancelled(order_sn)
                .await
                .map(LedgerOutcome::OrderCancelled),
            OrderLifecycleEvent::AfterSaleRefunded { after_sale_sn } => self
                .on_refund(after_sale_sn)
                .await
                .map(LedgerOutcome::AfterSaleRefunded),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "分销事件处理失败");
                "failure"
            }
        };
        metrics::record_distribution_event(event.name(), outcome, start.elapsed().as_secs_f64());

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AffiliateAccount, DistributionSetting, Order, PayStatus, TransactionLine};
    use crate::repository::{BalanceOperation, MemoryLedgerStore, MockSettingProvider};
    use rust_decimal_macros::dec;

    fn seed(store: &MemoryLedgerStore) {
        store.insert_order(Order {
            sn: "O1".to_string(),
            member_id: "M1".to_string(),
            store_id: "S1".to_string(),
            affiliate_id: Some("D1".to_string()),
            pay_status: PayStatus::Paid,
            created_at: Utc::now(),
        });
        store.insert_line(TransactionLine {
            order_sn: "O1".to_string(),
            order_item_sn: "O1-1".to_string(),
            refund_sn: None,
            store_id: "S1".to_string(),
            store_name: "店铺".to_string(),
            member_id: "M1".to_string(),
            member_name: "买家".to_string(),
            goods_id: "G1".to_string(),
            goods_name: "商品".to_string(),
            image: None,
            num: 1,
            distribution_rebate: Some(dec!(3.30)),
        });
        store.insert_affiliate(AffiliateAccount {
            id: "D1".to_string(),
            member_id: "M9".to_string(),
            member_name: "分销员".to_string(),
            rebate_total: Decimal::ZERO,
            withdrawable_rebate: Decimal::ZERO,
            updated_at: Utc::now(),
        });
    }

    #[tokio::test]
    async fn test_setting_read_once_per_paid_order() {
        let store = Arc::new(MemoryLedgerStore::new());
        seed(&store);

        let mut settings = MockSettingProvider::new();
        settings
            .expect_distribution_setting()
            .times(1)
            .returning(|| Ok(DistributionSetting::new(5)));

        let service = DistributionOrderService::new(store.clone(), Arc::new(settings));
        let outcome = service.on_order_paid("O1").await.unwrap();

        assert_eq!(
            outcome,
            PayOrderOutcome::Recorded {
                created: 1,
                total_rebate: dec!(3.30)
            }
        );
        let rows = store.commission_orders();
        assert_eq!(rows[0].settle_at - rows[0].created_at, chrono::Duration::days(5));
    }

    #[tokio::test]
    async fn test_setting_failure_rolls_back() {
        let store = Arc::new(MemoryLedgerStore::new());
        seed(&store);

        let mut settings = MockSettingProvider::new();
        settings
            .expect_distribution_setting()
            .returning(|| Err(DistributionError::InvalidSetting("cashDay=-1".to_string())));

        let service = DistributionOrderService::new(store.clone(), Arc::new(settings));
        let err = service.on_order_paid("O1").await.unwrap_err();

        assert!(matches!(err, DistributionError::InvalidSetting(_)));
        assert!(store.commission_orders().is_empty());
        assert!(store.balance_operations().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_cash_day_rolls_back() {
        let store = Arc::new(MemoryLedgerStore::new());
        seed(&store);

        let mut settings = MockSettingProvider::new();
        settings
            .expect_distribution_setting()
            .returning(|| Ok(DistributionSetting::new(999_999_999)));

        let service = DistributionOrderService::new(store.clone(), Arc::new(settings));
        let err = service.on_order_paid("O1").await.unwrap_err();

        assert!(matches!(err, DistributionError::InvalidSetting(_)));
        assert!(store.commission_orders().is_empty());
        assert!(store.balance_operations().is_empty());
        assert_eq!(store.affiliate("D1").unwrap().rebate_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_non_distribution_order_skips_setting() {
        let store = Arc::new(MemoryLedgerStore::new());
        store.insert_order(Order {
            sn: "O2".to_string(),
            member_id: "M1".to_string(),
            store_id: "S1".to_string(),
            affiliate_id: None,
            pay_status: PayStatus::Paid,
            created_at: Utc::now(),
        });

        let mut settings = MockSettingProvider::new();
        settings.expect_distribution_setting().never();

        let service = DistributionOrderService::new(store.clone(), Arc::new(settings));
        let outcome = service.on_order_paid("O2").await.unwrap();

        assert_eq!(outcome, PayOrderOutcome::NotDistributionOrder);
        assert!(store.balance_operations().is_empty());
    }

    #[tokio::test]
    async fn test_handle_event_dispatch() {
        let store = Arc::new(MemoryLedgerStore::new());
        seed(&store);

        let mut settings = MockSettingProvider::new();
        settings
            .expect_distribution_setting()
            .returning(|| Ok(DistributionSetting::new(1)));
        let service = DistributionOrderService::new(store.clone(), Arc::new(settings));

        let paid = OrderLifecycleEvent::OrderPaid {
            order_sn: "O1".to_string(),
        };
        assert!(matches!(
            service.handle_event(&paid).await.unwrap(),
            LedgerOutcome::OrderPaid(PayOrderOutcome::Recorded { created: 1, .. })
        ));

        let cancelled = OrderLifecycleEvent::OrderCancelled {
            order_sn: "O1".to_string(),
        };
        assert!(matches!(
            service.handle_event(&cancelled).await.unwrap(),
            LedgerOutcome::OrderCancelled(CancelOrderOutcome { cancelled_rows: 1, .. })
        ));

        assert_eq!(
            store.balance_operations(),
            vec![
                BalanceOperation::AddRebate {
                    affiliate_id: "D1".to_string(),
                    amount: dec!(3.30)
                },
                BalanceOperation::AddRebate {
                    affiliate_id: "D1".to_string(),
                    amount: dec!(-3.30)
                },
            ]
        );

        let missing = OrderLifecycleEvent::OrderPaid {
            order_sn: "NOPE".to_string(),
        };
        assert!(matches!(
            service.handle_event(&missing).await,
            Err(DistributionError::OrderNotFound(_))
        ));
    }
}
