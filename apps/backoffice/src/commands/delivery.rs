//! # Delivery Commands

use tracing::{debug, info};

use crate::error::ApiError;
use crate::identity::Session;
use crate::Backoffice;
use bizdesk_core::validation::{validate_delivery, RawFields};
use bizdesk_core::{Delivery, DeliveryListing};

/// Validates the delivery form and stores the delivery.
///
/// The referenced sale must exist.
pub async fn add_delivery(
    app: &Backoffice,
    session: &Session,
    raw: &RawFields,
) -> Result<Delivery, ApiError> {
    debug!(user_id = %session.user_id, "add_delivery command");

    let draft = validate_delivery(raw)?;

    if app
        .db()
        .sales()
        .get_by_id(&draft.sales_record_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Sale", &draft.sales_record_id));
    }

    let delivery = app
        .db()
        .deliveries()
        .insert(&Delivery::from_draft(draft))
        .await?;

    info!(
        id = %delivery.id,
        sales_record_id = %delivery.sales_record_id,
        status = %delivery.delivery_status,
        "Delivery added"
    );
    Ok(delivery)
}

/// Lists deliveries, newest first, with the sale they ship.
pub async fn list_deliveries(
    app: &Backoffice,
    session: &Session,
) -> Result<Vec<DeliveryListing>, ApiError> {
    debug!(user_id = %session.user_id, "list_deliveries command");

    Ok(app.db().deliveries().list_with_sale_info().await?)
}
