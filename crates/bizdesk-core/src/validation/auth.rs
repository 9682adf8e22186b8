//! Sign-in and sign-up form schemas.
//!
//! Passwords are never trimmed. Sign-up password strength is checked as
//! four independent requirements, reported in a fixed order.

use super::rules::{
    digit_pattern, is_match, is_valid_email, lowercase_pattern, special_pattern,
    uppercase_pattern, username_pattern, RawFields, TextRule,
};
use super::ValidationResult;
use crate::error::FieldErrors;
use crate::types::{SignInCredentials, SignUpCredentials};

fn email_rule(raw: &RawFields) -> TextRule {
    TextRule::required("email", raw)
        .check(is_valid_email, "Invalid email format")
        .max_chars(255, "Email must be less than 255 characters")
}

/// Validates the sign-in form.
pub fn validate_sign_in(raw: &RawFields) -> ValidationResult<SignInCredentials> {
    let mut errors = FieldErrors::new();

    let email = email_rule(raw).finish_required(&mut errors);
    let password = TextRule::untrimmed("password", raw)
        .non_empty("Password is required")
        .finish_required(&mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => {
            Ok(SignInCredentials { email, password })
        }
        _ => Err(errors),
    }
}

/// Validates the sign-up form.
///
/// ```rust
/// use bizdesk_core::validation::{validate_sign_up, RawFields};
///
/// let raw = RawFields::new()
///     .text("email", "owner@shop.example")
///     .text("password", "abc12345")
///     .text("username", "owner");
///
/// let errors = validate_sign_up(&raw).unwrap_err();
/// assert_eq!(
///     errors.message("password"),
///     Some("Password must contain at least one uppercase letter")
/// );
/// ```
pub fn validate_sign_up(raw: &RawFields) -> ValidationResult<SignUpCredentials> {
    let mut errors = FieldErrors::new();

    let email = email_rule(raw).finish_required(&mut errors);

    let password = TextRule::untrimmed("password", raw)
        .min_chars(8, "Password must be at least 8 characters long")
        .max_chars(128, "Password must be less than 128 characters")
        .check(
            |p| is_match(lowercase_pattern(), p),
            "Password must contain at least one lowercase letter",
        )
        .check(
            |p| is_match(uppercase_pattern(), p),
            "Password must contain at least one uppercase letter",
        )
        .check(
            |p| is_match(digit_pattern(), p),
            "Password must contain at least one number",
        )
        .check(
            |p| is_match(special_pattern(), p),
            "Password must contain at least one special character (@$!%*?&)",
        )
        .finish_required(&mut errors);

    let username = TextRule::required("username", raw)
        .min_chars(3, "Username must be at least 3 characters long")
        .max_chars(30, "Username must be less than 30 characters")
        .matches(
            username_pattern(),
            "Username can only contain letters, numbers, hyphens, and underscores",
        )
        .finish_required(&mut errors);

    match (email, password, username) {
        (Some(email), Some(password), Some(username)) if errors.is_empty() => {
            Ok(SignUpCredentials {
                email,
                password,
                username,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str) -> RawFields {
        RawFields::new()
            .text("email", "owner@shop.example")
            .text("password", password)
            .text("username", "shop_owner")
    }

    #[test]
    fn test_sign_in_keeps_password_untrimmed() {
        let raw = RawFields::new()
            .text("email", "  owner@shop.example ")
            .text("password", " secret ");
        let creds = validate_sign_in(&raw).unwrap();
        assert_eq!(creds.email, "owner@shop.example");
        assert_eq!(creds.password, " secret ");
    }

    #[test]
    fn test_sign_in_errors() {
        let raw = RawFields::new().text("email", "nope").text("password", "");
        let errors = validate_sign_in(&raw).unwrap_err();
        assert_eq!(errors.message("email"), Some("Invalid email format"));
        assert_eq!(errors.message("password"), Some("Password is required"));
    }

    #[test]
    fn test_password_requirements_in_order() {
        let cases = [
            ("Ab1!", "Password must be at least 8 characters long"),
            ("ABCDEFG1!", "Password must contain at least one lowercase letter"),
            ("abc12345", "Password must contain at least one uppercase letter"),
            ("Abcdefgh!", "Password must contain at least one number"),
            ("Abcdefg\u{0663}!", "Password must contain at least one number"),
            ("Abcdefg1", "Password must contain at least one special character (@$!%*?&)"),
        ];

        for (password, expected) in cases {
            let errors = validate_sign_up(&sign_up(password)).unwrap_err();
            assert_eq!(errors.message("password"), Some(expected), "password {:?}", password);
        }

        let long = format!("Aa1!{}", "x".repeat(125));
        let errors = validate_sign_up(&sign_up(&long)).unwrap_err();
        assert_eq!(
            errors.message("password"),
            Some("Password must be less than 128 characters")
        );

        assert!(validate_sign_up(&sign_up("Abcdef1!")).is_ok());
    }

    #[test]
    fn test_username_rules() {
        let errors = validate_sign_up(&sign_up("Abcdef1!").text("username", "ab")).unwrap_err();
        assert_eq!(
            errors.message("username"),
            Some("Username must be at least 3 characters long")
        );

        let errors =
            validate_sign_up(&sign_up("Abcdef1!").text("username", "shop owner")).unwrap_err();
        assert_eq!(
            errors.message("username"),
            Some("Username can only contain letters, numbers, hyphens, and underscores")
        );

        let errors =
            validate_sign_up(&sign_up("Abcdef1!").text("username", "u".repeat(31))).unwrap_err();
        assert_eq!(
            errors.message("username"),
            Some("Username must be less than 30 characters")
        );
    }
}
