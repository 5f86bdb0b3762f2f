//! 分销员仓储
//!
//! 余额字段只通过增量 UPDATE 修改，从不整行回写

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::error::{DistributionError, Result};
use crate::models::AffiliateAccount;

/// 分销员仓储
pub struct AffiliateRepository {
    pool: PgPool,
}

impl AffiliateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, affiliate_id: &str) -> Result<Option<AffiliateAccount>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in_tx(&mut conn, affiliate_id).await
    }

    pub async fn get_in_tx(
        conn: &mut PgConnection,
        affiliate_id: &str,
    ) -> Result<Option<AffiliateAccount>> {
        let affiliate = sqlx::query_as::<_, AffiliateAccount>(
            r#"
            SELECT id, member_id, member_name, rebate_total, withdrawable_rebate, updated_at
            FROM affiliates
            WHERE id = $1
            "#,
        )
        .bind(affiliate_id)
        .fetch_optional(conn)
        .await?;

        Ok(affiliate)
    }

    /// 累计佣金与可提现佣金同时调整
    pub async fn add_rebate_in_tx(
        conn: &mut PgConnection,
        amount: Decimal,
        affiliate_id: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE affiliates
            SET rebate_total = rebate_total + $1,
                withdrawable_rebate = withdrawable_rebate + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(amount)
        .bind(affiliate_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DistributionError::AffiliateNotFound(affiliate_id.to_string()));
        }
        Ok(())
    }

    /// 只调整可提现佣金
    pub async fn subtract_withdrawable_in_tx(
        conn: &mut PgConnection,
        amount: Decimal,
        affiliate_id: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE affiliates
            SET withdrawable_rebate = withdrawable_rebate + $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(amount)
        .bind(affiliate_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DistributionError::AffiliateNotFound(affiliate_id.to_string()));
        }
        Ok(())
    }
}
