//! # Delivery Repository
//!
//! Deliveries reference a sale; the list view joins through the sale to
//! show what was sold and to whom.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bizdesk_core::{Delivery, DeliveryListing, DeliveryStatus};

/// Repository for delivery database operations.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    /// Creates a new DeliveryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryRepository { pool }
    }

    /// Inserts a new delivery and returns it.
    ///
    /// Fails with `ForeignKeyViolation` if the sale doesn't exist.
    pub async fn insert(&self, delivery: &Delivery) -> DbResult<Delivery> {
        debug!(
            id = %delivery.id,
            sales_record_id = %delivery.sales_record_id,
            status = %delivery.delivery_status,
            "Inserting delivery"
        );

        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, sales_record_id, delivery_address, delivery_status,
                tracking_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&delivery.id)
        .bind(&delivery.sales_record_id)
        .bind(&delivery.delivery_address)
        .bind(delivery.delivery_status)
        .bind(&delivery.tracking_number)
        .bind(delivery.created_at)
        .bind(delivery.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(delivery.clone())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Delivery>> {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT id, sales_record_id, delivery_address, delivery_status,
                   tracking_number, created_at, updated_at
            FROM deliveries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(delivery)
    }

    /// Lists deliveries with their sale details, newest first.
    pub async fn list_with_sale_info(&self) -> DbResult<Vec<DeliveryListing>> {
        let deliveries = sqlx::query_as::<_, DeliveryListing>(
            r#"
            SELECT
                d.id,
                d.sales_record_id,
                d.delivery_address,
                d.delivery_status,
                d.tracking_number,
                s.total_value_cents AS sale_total_value_cents,
                s.sale_date,
                p.name AS product_name,
                c.name AS customer_name,
                d.created_at
            FROM deliveries d
            INNER JOIN sales_records s ON s.id = d.sales_record_id
            INNER JOIN products p ON p.id = s.product_id
            LEFT JOIN customers c ON c.id = s.customer_id
            ORDER BY d.created_at DESC, d.rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = deliveries.len(), "Listed deliveries");
        Ok(deliveries)
    }

    /// Counts deliveries in the given status.
    pub async fn count_by_status(&self, status: DeliveryStatus) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE delivery_status = ?1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
