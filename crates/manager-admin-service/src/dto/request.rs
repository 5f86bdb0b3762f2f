//! 管理端请求 DTO 定义

use chrono::{DateTime, Utc};
use distribution::{CommissionOrderFilter, CommissionOrderStatus};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// 分页查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// 获取限制条数（最大100）
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, 100)
    }
}

/// 分销佣金订单查询参数
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_time_range"))]
pub struct CommissionOrderQueryParams {
    #[validate(length(max = 64, message = "分销员ID过长"))]
    pub affiliate_id: Option<String>,
    #[validate(length(max = 64, message = "分销员名称过长"))]
    pub affiliate_name: Option<String>,
    #[validate(length(max = 64, message = "店铺ID过长"))]
    pub store_id: Option<String>,
    pub status: Option<CommissionOrderStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 10000, message = "页码超出范围"))]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for CommissionOrderQueryParams {
    fn default() -> Self {
        Self {
            affiliate_id: None,
            affiliate_name: None,
            store_id: None,
            status: None,
            start_time: None,
            end_time: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn validate_time_range(params: &CommissionOrderQueryParams) -> Result<(), ValidationError> {
    match (params.start_time, params.end_time) {
        (Some(start), Some(end)) if start > end => {
            let mut err = ValidationError::new("time_range");
            err.message = Some("开始时间不能晚于结束时间".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// 空字符串视为未填写
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl CommissionOrderQueryParams {
    pub fn filter(&self) -> CommissionOrderFilter {
        CommissionOrderFilter {
            affiliate_id: non_blank(&self.affiliate_id),
            affiliate_name: non_blank(&self.affiliate_name),
            store_id: non_blank(&self.store_id),
            status: self.status,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
