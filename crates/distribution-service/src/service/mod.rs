//! 服务层
//!
//! 实现分销账本业务逻辑，协调事务存储与设置读取。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `ledger_service`: 订单支付、取消、售后退款的佣金处理
//! - `query_service`: 佣金订单查询服务（只读操作）

pub mod dto;
pub mod ledger_service;
pub mod query_service;

pub use dto::*;
pub use ledger_service::DistributionOrderService;
pub use query_service::CommissionOrderQueryService;
