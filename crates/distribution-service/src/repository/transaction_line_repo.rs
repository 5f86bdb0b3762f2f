//! 店铺流水仓储（只读）
//!
//! 分销账本只关心 `distribution_rebate` 不为空的流水

use sqlx::PgConnection;

use crate::error::Result;
use crate::models::TransactionLine;

const LINE_COLUMNS: &str = r#"
    order_sn, order_item_sn, refund_sn, store_id, store_name, member_id, member_name,
    goods_id, goods_name, image, num, distribution_rebate
"#;

/// 店铺流水仓储
pub struct TransactionLineRepository;

impl TransactionLineRepository {
    /// 列出订单下带佣金的流水
    pub async fn list_rebate_lines_by_order_in_tx(
        conn: &mut PgConnection,
        order_sn: &str,
    ) -> Result<Vec<TransactionLine>> {
        let lines = sqlx::query_as::<_, TransactionLine>(&format!(
            r#"
            SELECT {LINE_COLUMNS}
            FROM store_transactions
            WHERE order_sn = $1 AND distribution_rebate IS NOT NULL
            ORDER BY id
            "#
        ))
        .bind(order_sn)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }

    /// 按售后单号查找带佣金的流水
    pub async fn find_rebate_line_by_refund_sn_in_tx(
        conn: &mut PgConnection,
        refund_sn: &str,
    ) -> Result<Option<TransactionLine>> {
        let line = sqlx::query_as::<_, TransactionLine>(&format!(
            r#"
            SELECT {LINE_COLUMNS}
            FROM store_transactions
            WHERE refund_sn = $1 AND distribution_rebate IS NOT NULL
            LIMIT 1
            "#
        ))
        .bind(refund_sn)
        .fetch_optional(conn)
        .await?;

        Ok(line)
    }
}
