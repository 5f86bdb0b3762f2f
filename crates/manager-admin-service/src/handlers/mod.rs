//! HTTP 请求处理器

pub mod distribution_order;
pub mod member_stats;
