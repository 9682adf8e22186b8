//! # Commands Module
//!
//! All commands exposed to the web client.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Products, low stock, sale form prefill
//! ├── customer.rs   ◄─── Customers
//! ├── sale.rs       ◄─── Record and list sales
//! ├── delivery.rs   ◄─── Deliveries
//! ├── dashboard.rs  ◄─── Dashboard counters
//! ├── config.rs     ◄─── Business name, currency, thresholds
//! └── auth.rs       ◄─── Sign in / up / out
//! ```
//!
//! ## Command Shape
//! ```rust,ignore
//! async fn add_product(
//!     app: &Backoffice,     // shared context
//!     session: &Session,    // the signed-in caller
//!     raw: &RawFields,      // form fields as typed
//! ) -> Result<ProductDto, ApiError>
//! ```
//!
//! Every write validates its form before touching the database. A rejected
//! form comes back as `VALIDATION_ERROR` with one message per field.

pub mod auth;
pub mod config;
pub mod customer;
pub mod dashboard;
pub mod delivery;
pub mod product;
pub mod sale;

pub use auth::{sign_in, sign_out, sign_up};
pub use config::{get_config, ClientConfig};
pub use customer::{add_customer, list_customers};
pub use dashboard::dashboard_stats;
pub use delivery::{add_delivery, list_deliveries};
pub use product::{
    add_product, get_product, list_products, low_stock_products, sale_form_defaults, ProductDto,
    SaleFormDefaults,
};
pub use sale::{list_sales, record_sale, RecordSaleResponse};
