//! # Validation Module
//!
//! One declarative schema per entity kind. Every write in the back office
//! passes through here first.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client                                                   │
//! │  └── Collects raw form fields (text, numbers, blanks)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trim text (never passwords), blank optional → None                │
//! │  ├── Length, pattern, range, whole-number checks                       │
//! │  └── FieldErrors: one message per field, first failing rule wins       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Schemas are pure: the same input always gives the same result.

mod auth;
mod customer;
mod delivery;
mod product;
mod rules;
mod sale;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use auth::{validate_sign_in, validate_sign_up};
pub use customer::validate_customer;
pub use delivery::validate_delivery;
pub use product::validate_product;
pub use rules::{is_hyphenated_uuid, is_valid_email, RawFields, RawValue};
pub use sale::validate_sale;

use crate::error::FieldErrors;
use crate::types::{
    CustomerDraft, DeliveryDraft, ProductDraft, SaleDraft, SignInCredentials, SignUpCredentials,
};

/// Result of running a schema: the normalized record or per-field errors.
pub type ValidationResult<T> = Result<T, FieldErrors>;

/// The forms the back office validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Product,
    Sale,
    Delivery,
    SignIn,
    SignUp,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "customer",
            EntityKind::Product => "product",
            EntityKind::Sale => "sale",
            EntityKind::Delivery => "delivery",
            EntityKind::SignIn => "sign_in",
            EntityKind::SignUp => "sign_up",
        };
        f.write_str(name)
    }
}

/// A normalized record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidRecord {
    Customer(CustomerDraft),
    Product(ProductDraft),
    Sale(SaleDraft),
    Delivery(DeliveryDraft),
    SignIn(SignInCredentials),
    SignUp(SignUpCredentials),
}

impl ValidRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            ValidRecord::Customer(_) => EntityKind::Customer,
            ValidRecord::Product(_) => EntityKind::Product,
            ValidRecord::Sale(_) => EntityKind::Sale,
            ValidRecord::Delivery(_) => EntityKind::Delivery,
            ValidRecord::SignIn(_) => EntityKind::SignIn,
            ValidRecord::SignUp(_) => EntityKind::SignUp,
        }
    }
}

/// Runs the schema for `kind` against `raw`.
///
/// ```rust
/// use bizdesk_core::validation::{validate, EntityKind, RawFields, ValidRecord};
///
/// let raw = RawFields::new().text("name", "Ada Lovelace");
/// match validate(EntityKind::Customer, &raw).unwrap() {
///     ValidRecord::Customer(c) => assert_eq!(c.email, None),
///     other => panic!("unexpected {:?}", other.kind()),
/// }
/// ```
pub fn validate(kind: EntityKind, raw: &RawFields) -> ValidationResult<ValidRecord> {
    match kind {
        EntityKind::Customer => validate_customer(raw).map(ValidRecord::Customer),
        EntityKind::Product => validate_product(raw).map(ValidRecord::Product),
        EntityKind::Sale => validate_sale(raw).map(ValidRecord::Sale),
        EntityKind::Delivery => validate_delivery(raw).map(ValidRecord::Delivery),
        EntityKind::SignIn => validate_sign_in(raw).map(ValidRecord::SignIn),
        EntityKind::SignUp => validate_sign_up(raw).map(ValidRecord::SignUp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_kind() {
        let raw = RawFields::new()
            .text("email", "owner@shop.example")
            .text("password", "x");
        let record = validate(EntityKind::SignIn, &raw).unwrap();
        assert_eq!(record.kind(), EntityKind::SignIn);

        // Same fields fail the stricter sign-up schema.
        let errors = validate(EntityKind::SignUp, &raw).unwrap_err();
        assert!(errors.get("password").is_some());
        assert!(errors.get("username").is_some());
    }

    #[test]
    fn test_empty_form_fails_every_required_field() {
        let errors = validate(EntityKind::Delivery, &RawFields::new()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("tracking_number").is_none());
    }
}
