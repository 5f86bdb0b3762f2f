//! 分销设置

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DistributionError, Result};

/// 分销设置在 settings 表中的键
pub const DISTRIBUTION_SETTING_KEY: &str = "DISTRIBUTION_SETTING";

/// 未配置时的默认结算天数
pub const DEFAULT_CASH_DAY: i64 = 1;

/// 分销设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSetting {
    /// 佣金结算（解冻）天数
    #[serde(default = "default_cash_day")]
    pub cash_day: i64,
}

fn default_cash_day() -> i64 {
    DEFAULT_CASH_DAY
}

impl Default for DistributionSetting {
    fn default() -> Self {
        Self {
            cash_day: DEFAULT_CASH_DAY,
        }
    }
}

impl DistributionSetting {
    pub fn new(cash_day: i64) -> Self {
        Self { cash_day }
    }

    /// 结算天数不能为负
    pub fn is_valid(&self) -> bool {
        self.cash_day >= 0
    }

    /// 结算时间 = 基准时间 + 结算天数
    ///
    /// 天数过大导致时间溢出时返回 `InvalidSetting`
    pub fn settle_at(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>> {
        TimeDelta::try_days(self.cash_day)
            .and_then(|delta| from.checked_add_signed(delta))
            .ok_or_else(|| {
                DistributionError::InvalidSetting(format!("cashDay 超出范围: {}", self.cash_day))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_setting_value() {
        let setting: DistributionSetting = serde_json::from_str(r#"{"cashDay": 7}"#).unwrap();
        assert_eq!(setting.cash_day, 7);

        let setting: DistributionSetting = serde_json::from_str("{}").unwrap();
        assert_eq!(setting.cash_day, DEFAULT_CASH_DAY);
    }

    #[test]
    fn test_settle_at() {
        let now = Utc.with_ymd_and_hms(2026, 3, 30, 12, 0, 0).unwrap();
        let settle_at = DistributionSetting::new(3).settle_at(now).unwrap();
        assert_eq!(settle_at, Utc.with_ymd_and_hms(2026, 4, 2, 12, 0, 0).unwrap());

        assert_eq!(DistributionSetting::new(0).settle_at(now).unwrap(), now);
    }

    #[test]
    fn test_settle_at_out_of_range() {
        let now = Utc.with_ymd_and_hms(2026, 3, 30, 12, 0, 0).unwrap();

        let err = DistributionSetting::new(999_999_999).settle_at(now).unwrap_err();
        assert!(matches!(err, DistributionError::InvalidSetting(_)));

        let err = DistributionSetting::new(i64::MAX).settle_at(now).unwrap_err();
        assert!(matches!(err, DistributionError::InvalidSetting(_)));
    }

    #[test]
    fn test_is_valid() {
        assert!(DistributionSetting::new(0).is_valid());
        assert!(!DistributionSetting::new(-1).is_valid());
    }
}
