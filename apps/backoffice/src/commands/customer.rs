//! # Customer Commands

use tracing::{debug, info};

use crate::error::ApiError;
use crate::identity::Session;
use crate::Backoffice;
use bizdesk_core::validation::{validate_customer, RawFields};
use bizdesk_core::Customer;

/// Validates the customer form and stores the customer.
pub async fn add_customer(
    app: &Backoffice,
    session: &Session,
    raw: &RawFields,
) -> Result<Customer, ApiError> {
    debug!(user_id = %session.user_id, "add_customer command");

    let draft = validate_customer(raw)?;
    let customer = app
        .db()
        .customers()
        .insert(&Customer::from_draft(draft))
        .await?;

    info!(id = %customer.id, "Customer added");
    Ok(customer)
}

/// Lists customers, newest first.
pub async fn list_customers(app: &Backoffice, session: &Session) -> Result<Vec<Customer>, ApiError> {
    debug!(user_id = %session.user_id, "list_customers command");

    Ok(app.db().customers().list().await?)
}
