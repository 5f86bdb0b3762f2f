//! 管理端 DTO 模块

pub mod request;
pub mod response;

pub use request::{CommissionOrderQueryParams, PaginationParams};
pub use response::{ApiResponse, MemberOverviewDto, MemberRangeSummaryDto, PageResponse};
