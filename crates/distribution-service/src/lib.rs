//! 分销佣金服务
//!
//! 维护分销佣金订单（CommissionOrder）的生命周期，并通过分销员账户能力接口
//! 调整分销员的佣金余额。
//!
//! ## 核心功能
//!
//! - **订单支付**：按带佣金的店铺流水逐条生成待结算佣金订单，汇总后一次性累加分销员佣金
//! - **订单取消**：已支付的分销订单回退佣金，并将该订单下所有佣金订单标记为已取消
//! - **售后退款**：未结算的佣金订单直接作废，已结算的回退分销员可提现金额
//! - **佣金订单查询**：管理端分页查询
//!
//! 每个生命周期操作都在单个事务内完成，任一步骤失败整体回滚。
//!
//! ## 接入方式
//!
//! 本 crate 不包含消息消费者。订单与售后子系统在各自的消息循环里
//! 反序列化 [`OrderLifecycleEvent`] 并调用 [`DistributionOrderService::handle_event`]，
//! 处理失败时由调用方决定重试或告警：
//!
//! ```no_run
//! use std::sync::Arc;
//! use distribution::{DistributionOrderService, OrderLifecycleEvent, PgLedgerStore, SettingRepository};
//!
//! # async fn consume(pool: sqlx::PgPool, payload: &[u8]) -> distribution::Result<()> {
//! let service = DistributionOrderService::new(
//!     Arc::new(PgLedgerStore::new(pool.clone())),
//!     Arc::new(SettingRepository::new(pool)),
//! );
//!
//! let event: OrderLifecycleEvent = serde_json::from_slice(payload)?;
//! service.handle_event(&event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据访问层（PostgreSQL 与内存实现）
//! - `service`: 业务服务层
//! - `events`: 订单生命周期事件

pub mod error;
pub mod events;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{DistributionError, Result};
pub use events::OrderLifecycleEvent;
pub use models::*;
pub use repository::{
    BalanceOperation, CommissionOrderQuery, CommissionOrderRepository, FailPoint,
    FixedSettingProvider, LedgerStore, LedgerTransaction, MemoryLedgerStore, PgLedgerStore,
    SettingProvider, SettingRepository,
};
pub use service::dto::{
    CancelOrderOutcome, CommissionOrderPage, LedgerOutcome, PayOrderOutcome, RefundOrderOutcome,
};
pub use service::{CommissionOrderQueryService, DistributionOrderService, dto};
