//! Shared fixtures for the back-office integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bizdesk_backoffice::{
    AppConfig, Backoffice, InMemoryIdentity, SaleStore, SaleWriteMode, Session,
};
use bizdesk_core::validation::RawFields;
use bizdesk_core::{Money, Product, ProductDraft, Sale, SaleDraft};
use bizdesk_db::{Database, DbConfig, DbError, DbResult, StockDecrement};

pub async fn database() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// A database file under the temp dir, removed on drop.
pub struct FileDatabase {
    pub db: Database,
    path: PathBuf,
}

impl Drop for FileDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// A file-backed database whose pool really holds `connections` connections.
pub async fn file_database(connections: u32) -> FileDatabase {
    let path = std::env::temp_dir().join(format!("bizdesk-test-{}.db", uuid::Uuid::new_v4()));
    let db = Database::new(
        DbConfig::new(&path)
            .max_connections(connections)
            .min_connections(connections),
    )
    .await
    .unwrap();
    FileDatabase { db, path }
}

pub async fn backoffice(mode: SaleWriteMode) -> Backoffice {
    let mut config = AppConfig::with_db_path(":memory:");
    config.sale_write_mode = mode;
    Backoffice::new(database().await, config, Arc::new(InMemoryIdentity::new()))
}

pub fn session() -> Session {
    Session {
        user_id: "3b0f6a1e-8a55-4c1e-9d7f-2f4b8e0c1a22".to_string(),
        email: "owner@shop.example".to_string(),
        username: Some("owner".to_string()),
    }
}

/// Inserts a product priced at 4.50.
pub async fn product(db: &Database, name: &str, stock: i64) -> Product {
    let product = Product::from_draft(ProductDraft {
        name: name.to_string(),
        sku: None,
        description: None,
        price: Money::from_cents(450),
        stock_quantity: stock,
        category: None,
    });
    db.products().insert(&product).await.unwrap()
}

pub fn sale_draft(product: &Product, quantity: i64) -> SaleDraft {
    SaleDraft {
        product_id: product.id.clone(),
        customer_id: None,
        quantity_sold: quantity,
        unit_price: product.price(),
    }
}

pub fn sale_form(product_id: &str, quantity: f64, unit_price: f64) -> RawFields {
    RawFields::new()
        .text("product_id", product_id)
        .number("quantity_sold", quantity)
        .number("unit_price", unit_price)
}

pub async fn stock_of(db: &Database, id: &str) -> i64 {
    db.products()
        .get_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}

pub async fn sale_count(db: &Database) -> i64 {
    db.sales().totals().await.unwrap().0
}

// =============================================================================
// Fault-injecting store
// =============================================================================

/// Which store call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    ProductRead,
    InsertSale,
    SetStock,
    AtomicWrite,
}

/// Delegates to a real database except for the injected fault.
pub struct FaultyStore {
    pub db: Database,
    pub fault: Fault,
}

fn injected() -> DbError {
    DbError::QueryFailed("injected fault".to_string())
}

#[async_trait]
impl SaleStore for FaultyStore {
    async fn product(&self, id: &str) -> DbResult<Option<Product>> {
        if self.fault == Fault::ProductRead {
            return Err(injected());
        }
        self.db.products().get_by_id(id).await
    }

    async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        if self.fault == Fault::InsertSale {
            return Err(injected());
        }
        self.db.sales().insert(sale).await
    }

    async fn set_stock(&self, product_id: &str, new_stock: i64) -> DbResult<()> {
        if self.fault == Fault::SetStock {
            return Err(injected());
        }
        self.db.products().set_stock(product_id, new_stock).await
    }

    async fn insert_sale_with_decrement(&self, sale: &Sale) -> DbResult<StockDecrement> {
        if self.fault == Fault::AtomicWrite {
            return Err(DbError::TransactionFailed("injected fault".to_string()));
        }
        self.db.sales().insert_with_stock_decrement(sale).await
    }
}

/// Serves product reads from a snapshot taken before any sale, the way two
/// sessions both see the same stock before either writes.
pub struct StaleReadStore {
    pub db: Database,
    pub snapshot: Product,
}

#[async_trait]
impl SaleStore for StaleReadStore {
    async fn product(&self, _id: &str) -> DbResult<Option<Product>> {
        Ok(Some(self.snapshot.clone()))
    }

    async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        self.db.sales().insert(sale).await
    }

    async fn set_stock(&self, product_id: &str, new_stock: i64) -> DbResult<()> {
        self.db.products().set_stock(product_id, new_stock).await
    }

    async fn insert_sale_with_decrement(&self, sale: &Sale) -> DbResult<StockDecrement> {
        self.db.sales().insert_with_stock_decrement(sale).await
    }
}
