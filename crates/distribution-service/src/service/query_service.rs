//! 佣金订单查询服务
//!
//! 管理端分页查询，只读

use std::sync::Arc;

use tracing::instrument;

use crate::error::Result;
use crate::models::CommissionOrderFilter;
use crate::repository::CommissionOrderQuery;
use crate::service::dto::CommissionOrderPage;

const MAX_PAGE_SIZE: i64 = 100;

/// 佣金订单查询服务
pub struct CommissionOrderQueryService<Q>
where
    Q: CommissionOrderQuery + ?Sized,
{
    repo: Arc<Q>,
}

impl<Q> CommissionOrderQueryService<Q>
where
    Q: CommissionOrderQuery + ?Sized,
{
    pub fn new(repo: Arc<Q>) -> Self {
        Self { repo }
    }

    /// 分页查询，按创建时间倒序
    ///
    /// `page` 从 1 开始，`page_size` 限制在 1..=100，页码过大时返回空页
    #[instrument(skip(self))]
    pub async fn page(
        &self,
        filter: &CommissionOrderFilter,
        page: i64,
        page_size: i64,
    ) -> Result<CommissionOrderPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(page_size);

        let (items, total) = self.repo.page(filter, offset, page_size).await?;

        Ok(CommissionOrderPage {
            items,
            total,
            page,
            page_size,
        })
    }
}
