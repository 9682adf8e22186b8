//! Delivery form schema.

use super::rules::{is_hyphenated_uuid, RawFields, RawValue, TextRule};
use super::ValidationResult;
use crate::error::{FieldErrors, ValidationError};
use crate::types::{DeliveryDraft, DeliveryStatus};

/// Validates the delivery form.
pub fn validate_delivery(raw: &RawFields) -> ValidationResult<DeliveryDraft> {
    let mut errors = FieldErrors::new();

    let sales_record_id = TextRule::untrimmed("sales_record_id", raw)
        .check(is_hyphenated_uuid, "Please select a sale record")
        .finish_required(&mut errors);

    let delivery_address = TextRule::required("delivery_address", raw)
        .non_empty("Delivery address is required")
        .max_chars(500, "Delivery address must be less than 500 characters")
        .finish_required(&mut errors);

    let delivery_status = parse_status(raw, &mut errors);

    let tracking_number = TextRule::optional("tracking_number", raw)
        .max_chars(100, "Tracking number must be less than 100 characters")
        .finish(&mut errors);

    match (sales_record_id, delivery_address, delivery_status, tracking_number) {
        (Some(sales_record_id), Some(delivery_address), Some(delivery_status), Some(tracking_number))
            if errors.is_empty() =>
        {
            Ok(DeliveryDraft {
                sales_record_id,
                delivery_address,
                delivery_status,
                tracking_number,
            })
        }
        _ => Err(errors),
    }
}

/// The status must be one of the four literals exactly; anything else,
/// including a missing value, gets the same message.
fn parse_status(raw: &RawFields, errors: &mut FieldErrors) -> Option<DeliveryStatus> {
    let parsed = match raw.get("delivery_status") {
        Some(RawValue::Text(s)) => s.parse::<DeliveryStatus>().ok(),
        _ => None,
    };

    if parsed.is_none() {
        errors.record(ValidationError::NotAllowed {
            field: "delivery_status".to_string(),
            allowed: DeliveryStatus::ALL
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            message: "Invalid delivery status".to_string(),
        });
    }

    parsed
}
