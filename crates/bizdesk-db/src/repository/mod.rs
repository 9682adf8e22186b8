//! # Repository Module
//!
//! Database repository implementations for BizDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Back-office command                                                   │
//! │       │                                                                 │
//! │       │  db.products().list()                                          │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── insert(&self, product)                                            │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self)                                                       │
//! │  └── set_stock(&self, id, n)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Products and stock levels
//! - [`CustomerRepository`] - Customers
//! - [`SaleRepository`] - Sales records, including the atomic sale write
//! - [`DeliveryRepository`] - Deliveries

pub mod customer;
pub mod delivery;
pub mod product;
pub mod sale;

pub use customer::CustomerRepository;
pub use delivery::DeliveryRepository;
pub use product::ProductRepository;
pub use sale::{SaleRepository, StockDecrement};
