//! 分销佣金订单 API 处理器

use axum::{
    Json,
    extract::{Query, State},
};
use distribution::CommissionOrder;
use tracing::instrument;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, CommissionOrderQueryParams, PageResponse};
use crate::error::Result;
use crate::state::AppState;

/// 分页查询分销佣金订单
///
/// GET /api/manager/distribution/orders
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_commission_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<CommissionOrderQueryParams>,
) -> Result<Json<ApiResponse<PageResponse<CommissionOrder>>>> {
    params.validate()?;

    let pagination = params.pagination();
    let page = state
        .commission_orders
        .page(&params.filter(), pagination.page, pagination.limit())
        .await?;

    Ok(Json(ApiResponse::success(page.into())))
}
