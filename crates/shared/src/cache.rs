//! 缓存管理模块
//!
//! 提供 Redis 连接管理和常用缓存操作封装。
//!
//! 服务层依赖 [`CacheStore`] 抽象而非具体的 Redis 客户端，
//! 本地开发和测试可使用 [`MemoryCache`] 替代。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, instrument};

use crate::config::RedisConfig;
use crate::error::{MallError, Result};

/// 缓存存储接口
///
/// 只处理字符串值，类型化读写由 `dyn CacheStore` 上的 JSON 辅助方法完成
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;
    /// `ttl` 为 None 时永不过期
    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn delete(&self, key: &str) -> Result<()>;
}

impl<'a> dyn CacheStore + 'a {
    /// 读取并反序列化 JSON 值
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// 序列化为 JSON 后写入
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        self.set_raw(key, serialized, ttl).await
    }
}

/// Redis 缓存客户端
#[derive(Clone)]
pub struct Cache {
    client: Client,
}

impl Cache {
    /// 创建 Redis 客户端
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client created");
        Ok(Self { client })
    }

    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(MallError::from)
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(MallError::from)
    }
}

#[async_trait]
impl CacheStore for Cache {
    #[instrument(skip(self))]
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.get_conn().await?;
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_conn().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// 内存缓存
///
/// 基于 DashMap 实现，过期检查在读取时进行。适用于测试和本地开发。
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, (String, Option<Instant>)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => match entry.1 {
                Some(deadline) if deadline <= Instant::now() => true,
                _ => return Some(entry.0.clone()),
            },
            None => return None,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let deadline = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.insert(key.to_string(), (value, deadline));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live_value(key).is_some())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 缓存键前缀
///
/// 键格式与登录子系统保持一致：`{PREFIX}_SCOPE_suffix`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePrefix {
    /// 访问令牌（会话有效性）
    AccessToken,
    /// 用户权限列表
    PermissionList,
    /// 系统设置
    Setting,
}

impl CachePrefix {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessToken => "ACCESS_TOKEN",
            Self::PermissionList => "PERMISSION_LIST",
            Self::Setting => "SETTING",
        }
    }

    /// 带用户域的前缀，如 `{ACCESS_TOKEN}_MANAGER_`
    pub fn scoped(&self, scope: &str) -> String {
        format!("{{{}}}_{}_", self.name(), scope)
    }

    /// 带用户域的完整键
    pub fn scoped_key(&self, scope: &str, suffix: &str) -> String {
        format!("{}{}", self.scoped(scope), suffix)
    }

    /// 不区分用户域的完整键，如 `{SETTING}_DISTRIBUTION_SETTING`
    pub fn key(&self, suffix: &str) -> String {
        format!("{{{}}}_{}", self.name(), suffix)
    }
}
