//! 数据访问层
//!
//! 提供分销账本所需的 PostgreSQL 仓储、事务存储与内存实现

mod affiliate_repo;
mod commission_order_repo;
mod memory;
mod order_repo;
mod pg_store;
mod setting_repo;
mod traits;
mod transaction_line_repo;

pub use affiliate_repo::AffiliateRepository;
pub use commission_order_repo::CommissionOrderRepository;
pub use memory::{BalanceOperation, FailPoint, MemoryLedgerStore, MemoryLedgerTransaction};
pub use order_repo::OrderRepository;
pub use pg_store::{PgLedgerStore, PgLedgerTransaction};
pub use setting_repo::{FixedSettingProvider, SettingRepository};
pub use traits::*;
