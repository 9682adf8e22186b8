//! # bizdesk-core: Pure Business Logic for BizDesk
//!
//! This crate holds the entity types and the validation schemas that gate
//! every write in the back office. Nothing here touches the network or the
//! database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizDesk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (forms, lists)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw form fields                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            bizdesk-backoffice (commands, sale coordinator)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ FieldErrs │  │  schemas  │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │ CoreError │  │ per entity│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bizdesk-db (SQLite via sqlx)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Customer, Sale, Delivery) and read models
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain and validation error types
//! - [`validation`] - One schema per entity kind
//!
//! ## Example Usage
//!
//! ```rust
//! use bizdesk_core::validation::{validate_product, RawFields};
//!
//! let raw = RawFields::new()
//!     .text("name", "  Espresso Beans ")
//!     .text("sku", "COF-001")
//!     .number("price", 12.5)
//!     .number("stock_quantity", 40.0);
//!
//! let product = validate_product(&raw).unwrap();
//! assert_eq!(product.name, "Espresso Beans");
//! assert_eq!(product.price.cents(), 1250);
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, FieldErrors, ValidationError};
pub use money::Money;
pub use types::*;

/// Stock level below which a product is reported as running low.
///
/// The back office can override this through configuration; the dashboard
/// and the sale flow both fall back to this value.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Upper bound (inclusive) for stock and sold quantities.
pub const MAX_QUANTITY: i64 = 999_999;

/// Upper bound (inclusive) for prices, in cents.
pub const MAX_PRICE_CENTS: i64 = 99_999_999;
