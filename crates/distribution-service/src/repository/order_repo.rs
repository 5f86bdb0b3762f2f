//! 订单仓储（只读）

use sqlx::PgConnection;

use crate::error::Result;
use crate::models::Order;

const ORDER_COLUMNS: &str = "sn, member_id, store_id, distribution_id, pay_status, created_at";

/// 订单仓储
pub struct OrderRepository;

impl OrderRepository {
    /// 在事务中按订单编号查询
    pub async fn get_by_sn_in_tx(conn: &mut PgConnection, order_sn: &str) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE sn = $1"
        ))
        .bind(order_sn)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }
}
