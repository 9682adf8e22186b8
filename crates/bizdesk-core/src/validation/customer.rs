//! Customer form schema.

use super::rules::{customer_name_pattern, is_valid_email, phone_pattern, RawFields, TextRule};
use super::ValidationResult;
use crate::error::FieldErrors;
use crate::types::CustomerDraft;

/// Validates the customer form.
///
/// `name` is required; `email`, `phone` and `address` are optional and
/// normalize to `None` when blank.
pub fn validate_customer(raw: &RawFields) -> ValidationResult<CustomerDraft> {
    let mut errors = FieldErrors::new();

    let name = TextRule::required("name", raw)
        .non_empty("Name is required")
        .max_chars(100, "Name must be less than 100 characters")
        .matches(
            customer_name_pattern(),
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        )
        .finish_required(&mut errors);

    let email = TextRule::optional("email", raw)
        .check(is_valid_email, "Invalid email format")
        .max_chars(255, "Email must be less than 255 characters")
        .finish(&mut errors);

    let phone = TextRule::optional("phone", raw)
        .matches(phone_pattern(), "Invalid phone number format")
        .max_chars(20, "Phone number must be less than 20 characters")
        .finish(&mut errors);

    let address = TextRule::optional("address", raw)
        .max_chars(500, "Address must be less than 500 characters")
        .finish(&mut errors);

    match (name, email, phone, address) {
        (Some(name), Some(email), Some(phone), Some(address)) if errors.is_empty() => {
            Ok(CustomerDraft {
                name,
                email,
                phone,
                address,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_customer_is_trimmed() {
        let raw = RawFields::new()
            .text("name", "  Mary O'Brien-Smith ")
            .text("email", " mary@example.com ")
            .text("phone", "+1 (555) 010-2000")
            .text("address", "");

        let customer = validate_customer(&raw).unwrap();
        assert_eq!(customer.name, "Mary O'Brien-Smith");
        assert_eq!(customer.email.as_deref(), Some("mary@example.com"));
        assert_eq!(customer.phone.as_deref(), Some("+1 (555) 010-2000"));
        assert_eq!(customer.address, None);
    }

    #[test]
    fn test_name_rules() {
        let errors = validate_customer(&RawFields::new()).unwrap_err();
        assert_eq!(errors.message("name"), Some("Name is required"));

        let raw = RawFields::new().text("name", "R2D2");
        let errors = validate_customer(&raw).unwrap_err();
        assert_eq!(
            errors.message("name"),
            Some("Name can only contain letters, spaces, hyphens, and apostrophes")
        );

        // Length is checked before the pattern.
        let raw = RawFields::new().text("name", format!("{}1", "a".repeat(100)));
        let errors = validate_customer(&raw).unwrap_err();
        assert_eq!(
            errors.message("name"),
            Some("Name must be less than 100 characters")
        );
    }

    #[test]
    fn test_optional_field_errors() {
        let raw = RawFields::new()
            .text("name", "Ada")
            .text("email", "not-an-email")
            .text("phone", "555-CALL-NOW")
            .text("address", "x".repeat(501));

        let errors = validate_customer(&raw).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.message("email"), Some("Invalid email format"));
        assert_eq!(errors.message("phone"), Some("Invalid phone number format"));
        assert_eq!(
            errors.message("address"),
            Some("Address must be less than 500 characters")
        );
    }

    #[test]
    fn test_whitespace_only_optional_fields() {
        let raw = RawFields::new()
            .text("name", "Ada")
            .text("email", "   ")
            .text("phone", "  ")
            .text("address", " ");
        let errors = validate_customer(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("email"), Some("Invalid email format"));

        let customer = validate_customer(&raw.text("email", "")).unwrap();
        assert_eq!(customer.email, None);
        assert_eq!(customer.phone, None);
        assert_eq!(customer.address, None);
    }

    #[test]
    fn test_phone_pattern_caps_length() {
        // 21 digits fails the pattern before the length rule.
        let raw = RawFields::new()
            .text("name", "Ada")
            .text("phone", "1".repeat(21));
        let errors = validate_customer(&raw).unwrap_err();
        assert_eq!(errors.message("phone"), Some("Invalid phone number format"));
    }
}
