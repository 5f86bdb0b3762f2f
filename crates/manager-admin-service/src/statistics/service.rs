//! 会员统计服务

use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::instrument;

use super::range::{StatisticsQueryParam, date_range};
use super::repository::{MemberStatisticsData, MemberStatisticsStore};
use crate::error::Result;

/// 会员统计服务
pub struct MemberStatisticsService<S>
where
    S: MemberStatisticsStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> MemberStatisticsService<S>
where
    S: MemberStatisticsStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 可用会员总数
    #[instrument(skip(self))]
    pub async fn member_count(&self) -> Result<i64> {
        self.store.count_enabled_members().await
    }

    /// 今日新增会员数
    #[instrument(skip(self))]
    pub async fn today_member_num(&self, now: NaiveDateTime) -> Result<i64> {
        let begin_of_today = now.date().and_time(NaiveTime::MIN);
        self.store.count_created_after(begin_of_today).await
    }

    /// 截止某时间点的会员总数
    #[instrument(skip(self))]
    pub async fn member_count_before(&self, end: NaiveDateTime) -> Result<i64> {
        self.store.count_created_before(end).await
    }

    /// 活跃会员数
    #[instrument(skip(self))]
    pub async fn active_quantity(&self, start: NaiveDateTime) -> Result<i64> {
        self.store.count_active_since(start).await
    }

    /// 时间段内新增会员数
    #[instrument(skip(self))]
    pub async fn newly_added(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<i64> {
        self.store.count_created_between(start, end).await
    }

    /// 按查询参数取每日统计
    #[instrument(skip(self))]
    pub async fn statistics(
        &self,
        param: &StatisticsQueryParam,
        now: NaiveDateTime,
    ) -> Result<Vec<MemberStatisticsData>> {
        let range = date_range(param, now)?;
        self.store.list_daily(range.start, range.end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::statistics::SearchType;
    use crate::statistics::repository::MockMemberStatisticsStore;
    use chrono::NaiveDate;
    use mockall::predicate::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_today_member_num_uses_begin_of_day() {
        let begin = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let mut store = MockMemberStatisticsStore::new();
        store
            .expect_count_created_after()
            .with(eq(begin))
            .times(1)
            .returning(|_| Ok(12));

        let service = MemberStatisticsService::new(Arc::new(store));
        assert_eq!(service.today_member_num(now()).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_statistics_queries_resolved_range() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 13)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 19)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();

        let mut store = MockMemberStatisticsStore::new();
        store
            .expect_list_daily()
            .with(eq(start), eq(end))
            .times(1)
            .returning(move |s, _| {
                Ok(vec![MemberStatisticsData {
                    id: 1,
                    create_date: s,
                    member_count: 100,
                    newly_added: 3,
                    active_quantity: 40,
                }])
            });

        let service = MemberStatisticsService::new(Arc::new(store));
        let param = StatisticsQueryParam {
            search_type: Some(SearchType::LastSeven),
            ..Default::default()
        };
        let rows = service.statistics(&param, now()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].member_count, 100);
    }

    #[tokio::test]
    async fn test_statistics_invalid_param_skips_store() {
        let mut store = MockMemberStatisticsStore::new();
        store.expect_list_daily().never();

        let service = MemberStatisticsService::new(Arc::new(store));
        let result = service
            .statistics(&StatisticsQueryParam::default(), now())
            .await;
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_simple_counts_delegate() {
        let mut store = MockMemberStatisticsStore::new();
        store.expect_count_enabled_members().returning(|| Ok(500));
        store
            .expect_count_active_since()
            .with(eq(now()))
            .returning(|_| Ok(42));
        store
            .expect_count_created_before()
            .with(eq(now()))
            .returning(|_| Ok(480));
        store
            .expect_count_created_between()
            .with(eq(now()), eq(now()))
            .returning(|_, _| Ok(0));

        let service = MemberStatisticsService::new(Arc::new(store));
        assert_eq!(service.member_count().await.unwrap(), 500);
        assert_eq!(service.active_quantity(now()).await.unwrap(), 42);
        assert_eq!(service.member_count_before(now()).await.unwrap(), 480);
        assert_eq!(service.newly_added(now(), now()).await.unwrap(), 0);
    }
}
