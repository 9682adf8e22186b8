//! Sale form schema.

use super::product::{to_money, MAX_PRICE, MIN_PRICE};
use super::rules::{is_hyphenated_uuid, NumberRule, RawFields, TextRule};
use super::ValidationResult;
use crate::error::FieldErrors;
use crate::types::SaleDraft;
use crate::MAX_QUANTITY;

/// Validates the sale form.
///
/// Identifiers must be hyphenated UUIDs, so a malformed selection is
/// rejected here and never reaches the store. Stock is not checked here;
/// that is the sale coordinator's job.
pub fn validate_sale(raw: &RawFields) -> ValidationResult<SaleDraft> {
    let mut errors = FieldErrors::new();

    let product_id = TextRule::untrimmed("product_id", raw)
        .check(is_hyphenated_uuid, "Invalid product selection")
        .finish_required(&mut errors);

    let customer_id = TextRule::optional_untrimmed("customer_id", raw)
        .check(is_hyphenated_uuid, "Invalid customer selection")
        .finish(&mut errors);

    let quantity_sold = NumberRule::required("quantity_sold", raw)
        .integer("Quantity must be a whole number")
        .min(1.0, "Quantity must be at least 1")
        .max(MAX_QUANTITY as f64, "Quantity must be less than 1,000,000")
        .finish(&mut errors);

    let unit_price = NumberRule::required("unit_price", raw)
        .min(MIN_PRICE, "Unit price must be greater than 0")
        .max(MAX_PRICE, "Unit price must be less than 1,000,000")
        .finish(&mut errors)
        .and_then(|amount| to_money("unit_price", amount, &mut errors));

    match (product_id, customer_id, quantity_sold, unit_price) {
        (Some(product_id), Some(customer_id), Some(quantity), Some(unit_price))
            if errors.is_empty() =>
        {
            Ok(SaleDraft {
                product_id,
                customer_id,
                quantity_sold: quantity as i64,
                unit_price,
            })
        }
        _ => Err(errors),
    }
}
