//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use axum::extract::FromRef;
use distribution::{CommissionOrderQuery, CommissionOrderQueryService};

use crate::middleware::AuthState;
use crate::statistics::{MemberStatisticsService, MemberStatisticsStore};

/// Axum 应用共享状态
///
/// 服务均以 trait object 持有，便于测试时替换存储实现
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub member_statistics: Arc<MemberStatisticsService<dyn MemberStatisticsStore>>,
    pub commission_orders: Arc<CommissionOrderQueryService<dyn CommissionOrderQuery>>,
}

impl AppState {
    pub fn new(
        auth: AuthState,
        member_store: Arc<dyn MemberStatisticsStore>,
        commission_query: Arc<dyn CommissionOrderQuery>,
    ) -> Self {
        Self {
            auth,
            member_statistics: Arc::new(MemberStatisticsService::new(member_store)),
            commission_orders: Arc::new(CommissionOrderQueryService::new(commission_query)),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
