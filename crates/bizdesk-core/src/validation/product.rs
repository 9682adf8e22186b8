//! Product form schema.

use super::rules::{sku_pattern, NumberRule, RawFields, TextRule};
use super::ValidationResult;
use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::ProductDraft;
use crate::{MAX_PRICE_CENTS, MAX_QUANTITY};

/// Lowest accepted price, as typed.
pub(crate) const MIN_PRICE: f64 = 0.01;

/// Highest accepted price, as typed.
pub(crate) const MAX_PRICE: f64 = MAX_PRICE_CENTS as f64 / 100.0;

/// Validates the product form.
///
/// ## Rules
/// - `name`: required, at most 100 characters
/// - `sku`: optional, `A-Z 0-9 - _`, at most 50 characters
/// - `description`: optional, at most 1000 characters
/// - `price`: 0.01 to 999999.99, stored in cents
/// - `stock_quantity`: whole number, 0 to 999999
/// - `category`: optional, at most 50 characters
pub fn validate_product(raw: &RawFields) -> ValidationResult<ProductDraft> {
    let mut errors = FieldErrors::new();

    let name = TextRule::required("name", raw)
        .non_empty("Product name is required")
        .max_chars(100, "Product name must be less than 100 characters")
        .finish_required(&mut errors);

    let sku = TextRule::optional("sku", raw)
        .matches(
            sku_pattern(),
            "SKU can only contain uppercase letters, numbers, hyphens, and underscores",
        )
        .max_chars(50, "SKU must be less than 50 characters")
        .finish(&mut errors);

    let description = TextRule::optional("description", raw)
        .max_chars(1000, "Description must be less than 1000 characters")
        .finish(&mut errors);

    let price = NumberRule::required("price", raw)
        .min(MIN_PRICE, "Price must be greater than 0")
        .max(MAX_PRICE, "Price must be less than 1,000,000")
        .finish(&mut errors)
        .and_then(|amount| to_money("price", amount, &mut errors));

    let stock_quantity = NumberRule::required("stock_quantity", raw)
        .integer("Stock quantity must be a whole number")
        .min(0.0, "Stock quantity cannot be negative")
        .max(MAX_QUANTITY as f64, "Stock quantity must be less than 1,000,000")
        .finish(&mut errors);

    let category = TextRule::optional("category", raw)
        .max_chars(50, "Category must be less than 50 characters")
        .finish(&mut errors);

    match (name, sku, description, price, stock_quantity, category) {
        (Some(name), Some(sku), Some(description), Some(price), Some(stock), Some(category))
            if errors.is_empty() =>
        {
            Ok(ProductDraft {
                name,
                sku,
                description,
                price,
                stock_quantity: stock as i64,
                category,
            })
        }
        _ => Err(errors),
    }
}

/// Converts a range-checked decimal amount to cents.
pub(crate) fn to_money(field: &str, amount: f64, errors: &mut FieldErrors) -> Option<Money> {
    let money = Money::from_decimal(amount);
    if money.is_none() {
        errors.record(ValidationError::WrongType {
            field: field.to_string(),
            message: "Expected a finite amount".to_string(),
        });
    }
    money
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawFields {
        RawFields::new()
            .text("name", "Espresso Beans")
            .number("price", 12.5)
            .number("stock_quantity", 40.0)
    }

    #[test]
    fn test_minimal_product() {
        let product = validate_product(&base().text("sku", "").text("category", "  ")).unwrap();
        assert_eq!(product.sku, None);
        assert_eq!(product.category, None);
        assert_eq!(product.description, None);
        assert_eq!(product.price.cents(), 1250);
        assert_eq!(product.stock_quantity, 40);
    }

    #[test]
    fn test_name_length_counts_utf16_units() {
        let errors = validate_product(&base().text("name", "😀".repeat(60))).unwrap_err();
        assert_eq!(
            errors.message("name"),
            Some("Product name must be less than 100 characters")
        );

        let product = validate_product(&base().text("name", "😀".repeat(50))).unwrap();
        assert_eq!(product.name.chars().count(), 50);
    }

    #[test]
    fn test_sku_rules() {
        assert_eq!(
            validate_product(&base().text("sku", "ABC-123_X")).unwrap().sku.as_deref(),
            Some("ABC-123_X")
        );

        let errors = validate_product(&base().text("sku", "abc-123")).unwrap_err();
        assert_eq!(
            errors.message("sku"),
            Some("SKU can only contain uppercase letters, numbers, hyphens, and underscores")
        );

        // The pattern itself caps the length, so 51 characters fail the pattern.
        let errors = validate_product(&base().text("sku", "A".repeat(51))).unwrap_err();
        assert_eq!(
            errors.message("sku"),
            Some("SKU can only contain uppercase letters, numbers, hyphens, and underscores")
        );
    }

    #[test]
    fn test_price_boundaries() {
        assert_eq!(
            validate_product(&base().number("price", 0.01)).unwrap().price.cents(),
            1
        );
        assert_eq!(
            validate_product(&base().number("price", 999999.99)).unwrap().price.cents(),
            99_999_999
        );

        let errors = validate_product(&base().number("price", 0.0)).unwrap_err();
        assert_eq!(errors.message("price"), Some("Price must be greater than 0"));

        let errors = validate_product(&base().number("price", 1_000_000.0)).unwrap_err();
        assert_eq!(errors.message("price"), Some("Price must be less than 1,000,000"));
    }

    #[test]
    fn test_stock_quantity_rules() {
        let errors = validate_product(&base().number("stock_quantity", 2.5)).unwrap_err();
        assert_eq!(
            errors.message("stock_quantity"),
            Some("Stock quantity must be a whole number")
        );
        assert!(matches!(
            errors.get("stock_quantity"),
            Some(ValidationError::NotInteger { .. })
        ));

        let errors = validate_product(&base().number("stock_quantity", -1.0)).unwrap_err();
        assert_eq!(
            errors.message("stock_quantity"),
            Some("Stock quantity cannot be negative")
        );

        let errors = validate_product(&base().number("stock_quantity", 1_000_000.0)).unwrap_err();
        assert_eq!(
            errors.message("stock_quantity"),
            Some("Stock quantity must be less than 1,000,000")
        );

        assert_eq!(
            validate_product(&base().number("stock_quantity", 0.0)).unwrap().stock_quantity,
            0
        );
    }

    #[test]
    fn test_missing_everything() {
        let errors = validate_product(&RawFields::new()).unwrap_err();
        assert_eq!(errors.message("name"), Some("Product name is required"));
        assert_eq!(errors.message("price"), Some("Required"));
        assert_eq!(errors.message("stock_quantity"), Some("Required"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_is_deterministic() {
        let raw = base().text("name", "");
        assert_eq!(validate_product(&raw), validate_product(&raw));
    }
}
