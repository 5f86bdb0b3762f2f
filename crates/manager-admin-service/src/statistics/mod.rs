//! 会员统计
//!
//! - `range`: 查询参数到统计区间的换算
//! - `repository`: 会员及每日快照的查询
//! - `service`: 统计服务

mod range;
mod repository;
mod service;

pub use range::{DateRange, SearchType, StatisticsQueryParam, date_range};
pub use repository::{MemberStatisticsData, MemberStatisticsStore, PgMemberStatisticsStore};
pub use service::MemberStatisticsService;
