//! 会员统计 API 处理器

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, MemberOverviewDto, MemberRangeSummaryDto};
use crate::error::Result;
use crate::state::AppState;
use crate::statistics::{MemberStatisticsData, StatisticsQueryParam, date_range};

/// 统计口径按服务器本地时间
fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// 会员概况
///
/// GET /api/manager/statistics/member/overview
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn member_overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<MemberOverviewDto>>> {
    let now = local_now();
    let service = &state.member_statistics;

    let overview = MemberOverviewDto {
        member_count: service.member_count().await?,
        today_member_num: service.today_member_num(now).await?,
        active_quantity: service
            .active_quantity(now.date().and_time(NaiveTime::MIN))
            .await?,
    };

    Ok(Json(ApiResponse::success(overview)))
}

/// 区间会员汇总
///
/// GET /api/manager/statistics/member/summary?searchType=LAST_SEVEN
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn member_range_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(param): Query<StatisticsQueryParam>,
) -> Result<Json<ApiResponse<MemberRangeSummaryDto>>> {
    let range = date_range(&param, local_now())?;
    let service = &state.member_statistics;

    let summary = MemberRangeSummaryDto {
        member_count: service.member_count_before(range.end).await?,
        newly_added: service.newly_added(range.start, range.end).await?,
        active_quantity: service.active_quantity(range.start).await?,
    };

    Ok(Json(ApiResponse::success(summary)))
}

/// 每日会员统计
///
/// GET /api/manager/statistics/member?searchType=TODAY 或 ?year=2024&month=5
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn member_statistics(
    State(state): State<AppState>,
    user: AuthUser,
    Query(param): Query<StatisticsQueryParam>,
) -> Result<Json<ApiResponse<Vec<MemberStatisticsData>>>> {
    let rows = state
        .member_statistics
        .statistics(&param, local_now())
        .await?;
    Ok(Json(ApiResponse::success(rows)))
}
