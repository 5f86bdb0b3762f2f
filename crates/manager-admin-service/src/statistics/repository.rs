//! 会员统计数据访问

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::instrument;

use crate::error::Result;

/// 会员每日统计快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatisticsData {
    pub id: i64,
    pub create_date: NaiveDateTime,
    /// 截至当日的会员总数
    pub member_count: i64,
    pub newly_added: i64,
    pub active_quantity: i64,
}

/// 会员统计存储
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberStatisticsStore: Send + Sync {
    /// `disabled = true` 的会员数（该列为真表示账号可用）
    async fn count_enabled_members(&self) -> Result<i64>;

    /// 注册时间晚于 `after` 的会员数
    async fn count_created_after(&self, after: NaiveDateTime) -> Result<i64>;

    /// 注册时间早于 `before` 的会员数
    async fn count_created_before(&self, before: NaiveDateTime) -> Result<i64>;

    /// 最后登录时间不早于 `since` 的会员数
    async fn count_active_since(&self, since: NaiveDateTime) -> Result<i64>;

    /// 注册时间在闭区间内的会员数
    async fn count_created_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<i64>;

    /// 闭区间内的每日统计，按日期升序
    async fn list_daily(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<MemberStatisticsData>>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgMemberStatisticsStore {
    pool: PgPool,
}

impl PgMemberStatisticsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStatisticsStore for PgMemberStatisticsStore {
    #[instrument(skip(self))]
    async fn count_enabled_members(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE disabled = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_created_after(&self, after: NaiveDateTime) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE created_at > $1")
            .bind(after)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_created_before(&self, before: NaiveDateTime) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE created_at < $1")
            .bind(before)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_active_since(&self, since: NaiveDateTime) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE last_login_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_created_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE created_at BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_daily(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<MemberStatisticsData>> {
        let rows = sqlx::query_as::<_, MemberStatisticsData>(
            r#"
            SELECT id, create_date, member_count, newly_added, active_quantity
            FROM member_statistics_daily
            WHERE create_date BETWEEN $1 AND $2
            ORDER BY create_date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
