//! 分销佣金订单仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use super::traits::CommissionOrderQuery;
use crate::error::Result;
use crate::models::{
    CommissionOrder, CommissionOrderFilter, CommissionOrderStatus, NewCommissionOrder,
};

const COMMISSION_ORDER_COLUMNS: &str = r#"
    id, order_sn, order_item_sn, affiliate_id, affiliate_name, store_id, store_name,
    member_id, member_name, goods_id, goods_name, image, num, rebate_amount, status,
    settle_at, created_at
"#;

/// 分页查询的公共 WHERE 条件
const PAGE_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR affiliate_id = $1)
      AND ($2::text IS NULL OR strpos(affiliate_name, $2) > 0)
      AND ($3::text IS NULL OR store_id = $3)
      AND ($4::varchar IS NULL OR status = $4)
      AND ($5::timestamptz IS NULL OR created_at >= $5)
      AND ($6::timestamptz IS NULL OR created_at <= $6)
"#;

/// 分销佣金订单仓储
pub struct CommissionOrderRepository {
    pool: PgPool,
}

impl CommissionOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中创建佣金订单，返回新记录 ID
    pub async fn create_in_tx(conn: &mut PgConnection, order: &NewCommissionOrder) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO commission_orders (
                order_sn, order_item_sn, affiliate_id, affiliate_name, store_id, store_name,
                member_id, member_name, goods_id, goods_name, image, num, rebate_amount,
                status, settle_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(&order.order_sn)
        .bind(&order.order_item_sn)
        .bind(&order.affiliate_id)
        .bind(&order.affiliate_name)
        .bind(&order.store_id)
        .bind(&order.store_name)
        .bind(&order.member_id)
        .bind(&order.member_name)
        .bind(&order.goods_id)
        .bind(&order.goods_name)
        .bind(&order.image)
        .bind(order.num)
        .bind(order.rebate_amount)
        .bind(order.status)
        .bind(order.settle_at)
        .bind(order.created_at)
        .fetch_one(conn)
        .await?;

        Ok(row.get("id"))
    }

    pub async fn list_by_order_sn_in_tx(
        conn: &mut PgConnection,
        order_sn: &str,
    ) -> Result<Vec<CommissionOrder>> {
        let orders = sqlx::query_as::<_, CommissionOrder>(&format!(
            "SELECT {COMMISSION_ORDER_COLUMNS} FROM commission_orders WHERE order_sn = $1 ORDER BY id"
        ))
        .bind(order_sn)
        .fetch_all(conn)
        .await?;

        Ok(orders)
    }

    pub async fn find_by_order_item_sn_in_tx(
        conn: &mut PgConnection,
        order_item_sn: &str,
    ) -> Result<Option<CommissionOrder>> {
        let order = sqlx::query_as::<_, CommissionOrder>(&format!(
            "SELECT {COMMISSION_ORDER_COLUMNS} FROM commission_orders WHERE order_item_sn = $1"
        ))
        .bind(order_item_sn)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    pub async fn update_status_by_order_sn_in_tx(
        conn: &mut PgConnection,
        order_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        let result = sqlx::query("UPDATE commission_orders SET status = $2 WHERE order_sn = $1")
            .bind(order_sn)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_status_by_order_item_sn_in_tx(
        conn: &mut PgConnection,
        order_item_sn: &str,
        status: CommissionOrderStatus,
    ) -> Result<u64> {
        let result =
            sqlx::query("UPDATE commission_orders SET status = $2 WHERE order_item_sn = $1")
                .bind(order_item_sn)
                .bind(status)
                .execute(conn)
                .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CommissionOrderQuery for CommissionOrderRepository {
    #[instrument(skip(self))]
    async fn page(
        &self,
        filter: &CommissionOrderFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<CommissionOrder>, i64)> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM commission_orders {PAGE_FILTER}"
        ))
        .bind(&filter.affiliate_id)
        .bind(&filter.affiliate_name)
        .bind(&filter.store_id)
        .bind(filter.status)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .fetch_one(&self.pool)
        .await?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let items = sqlx::query_as::<_, CommissionOrder>(&format!(
            r#"
            SELECT {COMMISSION_ORDER_COLUMNS}
            FROM commission_orders
            {PAGE_FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $7 OFFSET $8
            "#
        ))
        .bind(&filter.affiliate_id)
        .bind(&filter.affiliate_name)
        .bind(&filter.store_id)
        .bind(filter.status)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }
}
