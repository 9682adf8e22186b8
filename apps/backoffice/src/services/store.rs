//! The storage operations the sale coordinator needs.
//!
//! Kept behind a trait so the coordinator can run against the SQLite
//! [`Database`] in production and against fault-injecting stores in tests.

use async_trait::async_trait;

use bizdesk_core::{Product, Sale};
use bizdesk_db::{Database, DbResult, StockDecrement};

#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Fresh read of a product row.
    async fn product(&self, id: &str) -> DbResult<Option<Product>>;

    /// Inserts a sale without touching stock.
    async fn insert_sale(&self, sale: &Sale) -> DbResult<()>;

    /// Overwrites a product's stock level.
    async fn set_stock(&self, product_id: &str, new_stock: i64) -> DbResult<()>;

    /// Decrements stock (only if enough is left) and inserts the sale, as
    /// one unit.
    async fn insert_sale_with_decrement(&self, sale: &Sale) -> DbResult<StockDecrement>;
}

#[async_trait]
impl SaleStore for Database {
    async fn product(&self, id: &str) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        self.sales().insert(sale).await
    }

    async fn set_stock(&self, product_id: &str, new_stock: i64) -> DbResult<()> {
        self.products().set_stock(product_id, new_stock).await
    }

    async fn insert_sale_with_decrement(&self, sale: &Sale) -> DbResult<StockDecrement> {
        self.sales().insert_with_stock_decrement(sale).await
    }
}
