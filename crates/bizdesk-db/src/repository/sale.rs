//! # Sale Repository
//!
//! Database operations for sales records.
//!
//! ## Two Ways to Record a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two-step (default)                  Atomic                            │
//! │  ──────────────────                  ──────                            │
//! │  insert(&sale)                       BEGIN                             │
//! │  products().set_stock(id, n)           UPDATE products                 │
//! │                                          SET stock = stock - q         │
//! │  Each call commits on its own;           WHERE id = p AND stock >= q   │
//! │  the coordinator sequences them.       rows_affected == 0 → ROLLBACK   │
//! │                                        INSERT sale                     │
//! │                                      COMMIT                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bizdesk_core::{Sale, SaleListing};

/// Result of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was decremented and the sale inserted.
    Applied { remaining: i64 },
    /// Not enough stock; nothing was written.
    Insufficient { available: i64 },
}

const SALE_COLUMNS: &str = "id, product_id, customer_id, quantity_sold, unit_price_cents, \
                            total_value_cents, sale_date";

/// Repository for sales records.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale. Stock is not touched.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(
            id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity_sold,
            "Inserting sale"
        );

        insert_sale(&self.pool, sale).await
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales_records WHERE id = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists sales with product and customer names, most recent first.
    pub async fn list_with_names(&self) -> DbResult<Vec<SaleListing>> {
        let sales = sqlx::query_as::<_, SaleListing>(
            r#"
            SELECT
                s.id,
                s.product_id,
                p.name AS product_name,
                s.customer_id,
                c.name AS customer_name,
                s.quantity_sold,
                s.unit_price_cents,
                s.total_value_cents,
                s.sale_date
            FROM sales_records s
            INNER JOIN products p ON p.id = s.product_id
            LEFT JOIN customers c ON c.id = s.customer_id
            ORDER BY s.sale_date DESC, s.rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Returns `(number_of_sales, revenue_cents)`.
    pub async fn totals(&self) -> DbResult<(i64, i64)> {
        let totals: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_value_cents), 0) FROM sales_records",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Decrements stock and inserts the sale in one transaction.
    ///
    /// The decrement is conditional on enough stock being present at write
    /// time, so concurrent sales cannot oversell. If it does not apply,
    /// nothing is written and the current stock is reported.
    ///
    /// ## Errors
    /// * `NotFound` - the product doesn't exist
    /// * any store error; the transaction is rolled back
    pub async fn insert_with_stock_decrement(&self, sale: &Sale) -> DbResult<StockDecrement> {
        debug!(id = %sale.id, product_id = %sale.product_id, "Recording sale atomically");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(&sale.product_id)
        .bind(sale.quantity_sold)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                    .bind(&sale.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            return match available {
                Some(available) => Ok(StockDecrement::Insufficient { available }),
                None => Err(DbError::not_found("Product", sale.product_id.as_str())),
            };
        }

        insert_sale(&mut *tx, sale).await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                .bind(&sale.product_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %sale.id, remaining = remaining, "Sale recorded atomically");
        Ok(StockDecrement::Applied { remaining })
    }
}

async fn insert_sale<'e, E>(executor: E, sale: &'e Sale) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite> + 'e,
{
    sqlx::query(
        r#"
        INSERT INTO sales_records (
            id, product_id, customer_id, quantity_sold,
            unit_price_cents, total_value_cents, sale_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.product_id)
    .bind(&sale.customer_id)
    .bind(sale.quantity_sold)
    .bind(sale.unit_price_cents)
    .bind(sale.total_value_cents)
    .bind(sale.sale_date)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bizdesk_core::{Money, Product, ProductDraft, SaleDraft};

    async fn setup(stock: i64) -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = Product::from_draft(ProductDraft {
            name: "Notebook".to_string(),
            sku: Some("NB-A5".to_string()),
            description: None,
            price: Money::from_cents(350),
            stock_quantity: stock,
            category: None,
        });
        db.products().insert(&product).await.unwrap();
        (db, product)
    }

    fn sale_of(product: &Product, quantity: i64) -> Sale {
        Sale::from_draft(&SaleDraft {
            product_id: product.id.clone(),
            customer_id: None,
            quantity_sold: quantity,
            unit_price: product.price(),
        })
    }

    #[tokio::test]
    async fn test_insert_and_list_with_names() {
        let (db, product) = setup(10).await;
        let sale = sale_of(&product, 2);
        db.sales().insert(&sale).await.unwrap();

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_value_cents, 700);

        let listing = db.sales().list_with_names().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].product_name, "Notebook");
        assert_eq!(listing[0].customer_name, None);

        // Insert alone never changes stock.
        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);

        assert_eq!(db.sales().totals().await.unwrap(), (1, 700));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_rejected() {
        let (db, product) = setup(10).await;
        let mut sale = sale_of(&product, 1);
        sale.customer_id = Some(uuid::Uuid::new_v4().to_string());

        let err = db.sales().insert(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_atomic_decrement_applies() {
        let (db, product) = setup(12).await;
        let sale = sale_of(&product, 5);

        let outcome = db.sales().insert_with_stock_decrement(&sale).await.unwrap();
        assert_eq!(outcome, StockDecrement::Applied { remaining: 7 });
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_atomic_decrement_insufficient_writes_nothing() {
        let (db, product) = setup(3).await;
        let sale = sale_of(&product, 5);

        let outcome = db.sales().insert_with_stock_decrement(&sale).await.unwrap();
        assert_eq!(outcome, StockDecrement::Insufficient { available: 3 });
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());

        let product = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_atomic_decrement_missing_product() {
        let (db, product) = setup(3).await;
        let mut sale = sale_of(&product, 1);
        sale.product_id = uuid::Uuid::new_v4().to_string();

        let err = db.sales().insert_with_stock_decrement(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
