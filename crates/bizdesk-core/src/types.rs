//! # Domain Types
//!
//! Entities, validated drafts and read models used throughout BizDesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Delivery     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │◄──│  sales_record_id│       │
//! │  │  sku (optional) │   │  customer_id ?  │   │  status         │       │
//! │  │  price_cents    │   │  quantity_sold  │   │  address        │       │
//! │  │  stock_quantity │   │  total_value    │   │  tracking ?     │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────▼────────┐                              │
//! │                        │    Customer     │                              │
//! │                        │  name, email ?  │                              │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  Drafts (ProductDraft, SaleDraft, ...) are what validation produces;   │
//! │  entities are what the store holds.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities are identified by UUID v4 strings assigned at insert time.
//! `Product::stock_quantity` is the only field that changes after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit, uppercase letters, digits, `-` and `_`.
    pub sku: Option<String>,

    pub description: Option<String>,

    /// Price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    pub category: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new product from a validated draft.
    pub fn from_draft(draft: ProductDraft) -> Self {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            sku: draft.sku,
            description: draft.description,
            price_cents: draft.price.cents(),
            stock_quantity: draft.stock_quantity,
            category: draft.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// True if stock is strictly below `threshold`.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_quantity < threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record. Sales may optionally reference one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Builds a new customer from a validated draft.
    pub fn from_draft(draft: CustomerDraft) -> Self {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// `total_value_cents` is fixed at creation as
/// `quantity_sold × unit_price_cents` and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub customer_id: Option<String>,
    pub quantity_sold: i64,
    pub unit_price_cents: i64,
    pub total_value_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Builds a new sale from a validated draft, computing its total.
    ///
    /// ```rust
    /// use bizdesk_core::{Money, Sale, SaleDraft};
    ///
    /// let sale = Sale::from_draft(&SaleDraft {
    ///     product_id: "6f1c7a52-2b7e-4c36-9d0a-3c1f2e8b9a10".to_string(),
    ///     customer_id: None,
    ///     quantity_sold: 3,
    ///     unit_price: Money::from_cents(10),
    /// });
    /// assert_eq!(sale.total_value_cents, 30);
    /// ```
    pub fn from_draft(draft: &SaleDraft) -> Self {
        Sale {
            id: Uuid::new_v4().to_string(),
            product_id: draft.product_id.clone(),
            customer_id: draft.customer_id.clone(),
            quantity_sold: draft.quantity_sold,
            unit_price_cents: draft.unit_price.cents(),
            total_value_cents: draft.total_value().cents(),
            sale_date: Utc::now(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

// =============================================================================
// Delivery Status
// =============================================================================

/// Lifecycle state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [DeliveryStatus; 4] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Cancelled,
    ];

    /// The literal stored in the database and sent by the form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failure for [`DeliveryStatus`]; carries the rejected literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeliveryStatus(pub String);

impl fmt::Display for UnknownDeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown delivery status: {}", self.0)
    }
}

impl std::error::Error for UnknownDeliveryStatus {}

impl FromStr for DeliveryStatus {
    type Err = UnknownDeliveryStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownDeliveryStatus(s.to_string()))
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// A delivery attached to a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Delivery {
    pub id: String,
    pub sales_record_id: String,
    pub delivery_address: String,
    pub delivery_status: DeliveryStatus,
    pub tracking_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Builds a new delivery from a validated draft.
    pub fn from_draft(draft: DeliveryDraft) -> Self {
        let now = Utc::now();
        Delivery {
            id: Uuid::new_v4().to_string(),
            sales_record_id: draft.sales_record_id,
            delivery_address: draft.delivery_address,
            delivery_status: draft.delivery_status,
            tracking_number: draft.tracking_number,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Validated Drafts
// =============================================================================

/// Normalized product input. Optional text is `None` when left blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i64,
    pub category: Option<String>,
}

/// Normalized customer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Normalized sale input, ready for the sale coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    pub product_id: String,
    pub customer_id: Option<String>,
    pub quantity_sold: i64,
    pub unit_price: Money,
}

impl SaleDraft {
    /// `quantity_sold × unit_price`, exact in cents.
    #[inline]
    pub fn total_value(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity_sold)
    }
}

/// Normalized delivery input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryDraft {
    pub sales_record_id: String,
    pub delivery_address: String,
    pub delivery_status: DeliveryStatus,
    pub tracking_number: Option<String>,
}

/// Sign-in form. The password is kept exactly as typed.
#[derive(Clone, PartialEq, Deserialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

/// Sign-up form. The password is kept exactly as typed.
#[derive(Clone, PartialEq, Deserialize)]
pub struct SignUpCredentials {
    pub email: String,
    pub password: String,
    pub username: String,
}

// Credentials never print their password.
impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("username", &self.username)
            .finish()
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A sale joined with the names shown in the sales list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleListing {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub quantity_sold: i64,
    pub unit_price_cents: i64,
    pub total_value_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

/// A delivery joined with the sale details shown in the deliveries list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DeliveryListing {
    pub id: String,
    pub sales_record_id: String,
    pub delivery_address: String,
    pub delivery_status: DeliveryStatus,
    pub tracking_number: Option<String>,
    pub sale_total_value_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub product_name: String,
    pub customer_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_sales: i64,
    pub pending_deliveries: i64,
    /// Sum of every sale's total value, in cents.
    pub total_revenue_cents: i64,
    pub low_stock_count: i64,
}

/// Raised after a sale leaves a product below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockWarning {
    pub product_id: String,
    pub product_name: String,
    /// Stock left after the sale.
    pub remaining: i64,
}

impl fmt::Display for LowStockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Low stock: {} has only {} units left",
            self.product_name, self.remaining
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
