//! # Product Commands
//!
//! Add, list and inspect products, plus the prefill for the sale form.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::identity::Session;
use crate::Backoffice;
use bizdesk_core::validation::{validate_product, RawFields};
use bizdesk_core::Product;

/// Product as shown in the products table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    /// Price formatted with the configured currency symbol.
    pub price_display: String,
    pub stock_quantity: i64,
    pub category: Option<String>,
    /// Stock is below the configured threshold.
    pub is_low_stock: bool,
}

impl ProductDto {
    fn from_product(app: &Backoffice, p: Product) -> Self {
        let config = app.config();
        ProductDto {
            is_low_stock: p.is_low_stock(config.low_stock_threshold),
            price_display: config.format_currency(p.price_cents),
            id: p.id,
            name: p.name,
            sku: p.sku,
            description: p.description,
            price_cents: p.price_cents,
            stock_quantity: p.stock_quantity,
            category: p.category,
        }
    }
}

/// Values the sale form fills in once a product is picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFormDefaults {
    pub product_id: String,
    pub product_name: String,
    /// Decimal amount, as the form's unit price field expects it.
    pub unit_price: f64,
    pub available_stock: i64,
}

/// Validates the product form and stores the product.
pub async fn add_product(
    app: &Backoffice,
    session: &Session,
    raw: &RawFields,
) -> Result<ProductDto, ApiError> {
    debug!(user_id = %session.user_id, "add_product command");

    let draft = validate_product(raw)?;
    let product = app.db().products().insert(&Product::from_draft(draft)).await?;

    info!(id = %product.id, name = %product.name, "Product added");
    Ok(ProductDto::from_product(app, product))
}

/// Lists products, newest first.
pub async fn list_products(
    app: &Backoffice,
    session: &Session,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(user_id = %session.user_id, "list_products command");

    let products = app.db().products().list().await?;
    Ok(products
        .into_iter()
        .map(|p| ProductDto::from_product(app, p))
        .collect())
}

pub async fn get_product(
    app: &Backoffice,
    session: &Session,
    id: &str,
) -> Result<ProductDto, ApiError> {
    debug!(user_id = %session.user_id, id = %id, "get_product command");

    let product = app
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(ProductDto::from_product(app, product))
}

/// Prefills the sale form's unit price from the product's current price.
pub async fn sale_form_defaults(
    app: &Backoffice,
    session: &Session,
    product_id: &str,
) -> Result<SaleFormDefaults, ApiError> {
    debug!(user_id = %session.user_id, product_id = %product_id, "sale_form_defaults command");

    let product = app
        .db()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    Ok(SaleFormDefaults {
        unit_price: product.price_cents as f64 / 100.0,
        available_stock: product.stock_quantity,
        product_id: product.id,
        product_name: product.name,
    })
}

/// Products below the configured low-stock threshold, lowest stock first.
pub async fn low_stock_products(
    app: &Backoffice,
    session: &Session,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(user_id = %session.user_id, "low_stock_products command");

    let products = app
        .db()
        .products()
        .list_low_stock(app.config().low_stock_threshold)
        .await?;

    Ok(products
        .into_iter()
        .map(|p| ProductDto::from_product(app, p))
        .collect())
}
