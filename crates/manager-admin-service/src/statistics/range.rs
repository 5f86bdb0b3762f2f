//! 统计时间范围
//!
//! 快捷类型（今天/昨天/近7天/近30天）优先，否则按年月取整月。
//! 统计表使用不带时区的本地时间，这里统一用 `NaiveDateTime`。

use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// 快捷时间类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchType {
    Today,
    Yesterday,
    LastSeven,
    LastThirty,
}

/// 统计查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQueryParam {
    pub search_type: Option<SearchType>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// 闭区间 `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

fn begin_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 当天最后一毫秒
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    begin_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate, AdminError> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| AdminError::Validation("日期超出范围".to_string()))
}

/// 根据查询参数计算统计区间，`now` 由调用方注入
pub fn date_range(param: &StatisticsQueryParam, now: NaiveDateTime) -> Result<DateRange, AdminError> {
    let today = now.date();

    if let Some(search_type) = param.search_type {
        let range = match search_type {
            SearchType::Today => DateRange {
                start: begin_of_day(today),
                end: end_of_day(today),
            },
            SearchType::Yesterday => {
                let yesterday = days_before(today, 1)?;
                DateRange {
                    start: begin_of_day(yesterday),
                    end: end_of_day(yesterday),
                }
            }
            SearchType::LastSeven => DateRange {
                start: begin_of_day(days_before(today, 7)?),
                end: end_of_day(days_before(today, 1)?),
            },
            SearchType::LastThirty => DateRange {
                start: begin_of_day(days_before(today, 30)?),
                end: end_of_day(days_before(today, 1)?),
            },
        };
        return Ok(range);
    }

    match (param.year, param.month) {
        (Some(year), Some(month)) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| AdminError::Validation(format!("无效的年月: {year}-{month}")))?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or_else(|| AdminError::Validation(format!("无效的年月: {year}-{month}")))?;
            Ok(DateRange {
                start: begin_of_day(first),
                end: end_of_day(last),
            })
        }
        _ => Err(AdminError::Validation(
            "请指定 searchType 或 year、month".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn end(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
    }

    fn by_type(search_type: SearchType) -> StatisticsQueryParam {
        StatisticsQueryParam {
            search_type: Some(search_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_today_and_yesterday() {
        let now = at(2024, 3, 1, 15, 30);

        let today = date_range(&by_type(SearchType::Today), now).unwrap();
        assert_eq!(today.start, at(2024, 3, 1, 0, 0));
        assert_eq!(today.end, end(2024, 3, 1));

        // 跨月、闰年
        let yesterday = date_range(&by_type(SearchType::Yesterday), now).unwrap();
        assert_eq!(yesterday.start, at(2024, 2, 29, 0, 0));
        assert_eq!(yesterday.end, end(2024, 2, 29));
    }

    #[test]
    fn test_last_days_exclude_today() {
        let now = at(2024, 5, 20, 9, 0);

        let seven = date_range(&by_type(SearchType::LastSeven), now).unwrap();
        assert_eq!(seven.start, at(2024, 5, 13, 0, 0));
        assert_eq!(seven.end, end(2024, 5, 19));

        let thirty = date_range(&by_type(SearchType::LastThirty), now).unwrap();
        assert_eq!(thirty.start, at(2024, 4, 20, 0, 0));
        assert_eq!(thirty.end, end(2024, 5, 19));
    }

    #[test]
    fn test_year_month() {
        let param = StatisticsQueryParam {
            search_type: None,
            year: Some(2023),
            month: Some(12),
        };
        let range = date_range(&param, at(2024, 5, 20, 9, 0)).unwrap();
        assert_eq!(range.start, at(2023, 12, 1, 0, 0));
        assert_eq!(range.end, end(2023, 12, 31));

        let feb = StatisticsQueryParam {
            year: Some(2023),
            month: Some(2),
            ..Default::default()
        };
        assert_eq!(date_range(&feb, at(2024, 1, 1, 0, 0)).unwrap().end, end(2023, 2, 28));
    }

    #[test]
    fn test_search_type_takes_precedence() {
        let param = StatisticsQueryParam {
            search_type: Some(SearchType::Today),
            year: Some(2020),
            month: Some(1),
        };
        let now = at(2024, 5, 20, 9, 0);
        assert_eq!(date_range(&param, now).unwrap().start, at(2024, 5, 20, 0, 0));
    }

    #[test]
    fn test_invalid_params() {
        let now = at(2024, 5, 20, 9, 0);
        assert!(matches!(
            date_range(&StatisticsQueryParam::default(), now),
            Err(AdminError::Validation(_))
        ));

        let bad_month = StatisticsQueryParam {
            year: Some(2024),
            month: Some(13),
            ..Default::default()
        };
        assert!(matches!(date_range(&bad_month, now), Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_deserialize_query() {
        let param: StatisticsQueryParam =
            serde_json::from_str(r#"{"searchType":"LAST_SEVEN"}"#).unwrap();
        assert_eq!(param.search_type, Some(SearchType::LastSeven));
    }
}
