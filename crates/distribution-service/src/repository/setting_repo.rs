//! 系统设置仓储
//!
//! 分销设置以 JSON 文本存放在 settings 表，读取结果缓存一段时间

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use mall_shared::cache::{CachePrefix, CacheStore};

use super::traits::SettingProvider;
use crate::error::{DistributionError, Result};
use crate::models::{DISTRIBUTION_SETTING_KEY, DistributionSetting};

const SETTING_CACHE_TTL: Duration = Duration::from_secs(600);

/// 系统设置仓储
pub struct SettingRepository {
    pool: PgPool,
    cache: Option<Arc<dyn CacheStore>>,
}

impl SettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    /// 启用设置缓存
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 读取设置原始值
    pub async fn get_value(&self, id: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT setting_value FROM settings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn load_distribution_setting(&self) -> Result<DistributionSetting> {
        match self.get_value(DISTRIBUTION_SETTING_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                warn!(
                    key = DISTRIBUTION_SETTING_KEY,
                    "分销设置未配置，使用默认结算天数"
                );
                Ok(DistributionSetting::default())
            }
        }
    }

    async fn cached_setting(&self, cache: &dyn CacheStore, key: &str) -> Option<DistributionSetting> {
        match cache.get::<DistributionSetting>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "读取分销设置缓存失败，回源数据库");
                None
            }
        }
    }
}

#[async_trait]
impl SettingProvider for SettingRepository {
    #[instrument(skip(self))]
    async fn distribution_setting(&self) -> Result<DistributionSetting> {
        let cache_key = CachePrefix::Setting.key(DISTRIBUTION_SETTING_KEY);

        let cached = match &self.cache {
            Some(cache) => self.cached_setting(cache.as_ref(), &cache_key).await,
            None => None,
        };

        let setting = match cached {
            Some(setting) => {
                debug!("分销设置命中缓存");
                setting
            }
            None => {
                let setting = self.load_distribution_setting().await?;
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.set(&cache_key, &setting, Some(SETTING_CACHE_TTL)).await {
                        warn!(error = %e, "写入分销设置缓存失败");
                    }
                }
                setting
            }
        };

        if !setting.is_valid() {
            return Err(DistributionError::InvalidSetting(format!(
                "cashDay 不能为负数: {}",
                setting.cash_day
            )));
        }

        Ok(setting)
    }
}

/// 固定值设置，用于测试和本地运行
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSettingProvider {
    setting: DistributionSetting,
}

impl FixedSettingProvider {
    pub fn new(cash_day: i64) -> Self {
        Self {
            setting: DistributionSetting::new(cash_day),
        }
    }
}

#[async_trait]
impl SettingProvider for FixedSettingProvider {
    async fn distribution_setting(&self) -> Result<DistributionSetting> {
        if !self.setting.is_valid() {
            return Err(DistributionError::InvalidSetting(format!(
                "cashDay 不能为负数: {}",
                self.setting.cash_day
            )));
        }
        Ok(self.setting)
    }
}
