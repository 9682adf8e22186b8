//! # Field Rules
//!
//! Raw form input and the chainable per-field checks every schema is built
//! from.
//!
//! ## How a Field Is Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RawFields["name"] = Text("  Jo ")                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  TextRule::required("name", raw)     trim → "Jo"                        │
//! │        .non_empty("Name is required")         ✓                         │
//! │        .max_chars(100, "...")                 ✓                         │
//! │        .matches(name_pattern(), "...")        ✓                         │
//! │        .finish(&mut errors)  ──► Some("Jo")                             │
//! │                                                                         │
//! │  The first failing rule is kept; later rules are skipped.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::{FieldErrors, ValidationError};

// =============================================================================
// Raw Input
// =============================================================================

/// One raw form value as the web client sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    fn type_name(&self) -> &'static str {
        match self {
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "string",
            RawValue::Null => "null",
        }
    }
}

/// A raw form submission: field name → value.
///
/// ```rust
/// use bizdesk_core::validation::{RawFields, RawValue};
///
/// let raw: RawFields = serde_json::from_str(r#"{"name": "Ada", "stock_quantity": 4}"#).unwrap();
/// assert_eq!(raw.get("stock_quantity"), Some(&RawValue::Number(4.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFields(BTreeMap<String, RawValue>);

impl RawFields {
    pub fn new() -> Self {
        RawFields::default()
    }

    /// Sets a text value.
    pub fn text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), RawValue::Text(value.into()));
        self
    }

    /// Sets a numeric value.
    pub fn number(mut self, field: &str, value: f64) -> Self {
        self.0.insert(field.to_string(), RawValue::Number(value));
        self
    }

    /// Sets an explicit null.
    pub fn null(mut self, field: &str) -> Self {
        self.0.insert(field.to_string(), RawValue::Null);
        self
    }

    pub fn insert(&mut self, field: &str, value: RawValue) {
        self.0.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.0.get(field)
    }

    /// Returns the text value of `field`, if it holds text.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(RawValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

// =============================================================================
// Patterns
// =============================================================================

// Compiled once. A pattern that fails to compile matches nothing, so the
// field is rejected rather than accepted.
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> Option<&'static Regex> {
            static RE: OnceLock<Option<Regex>> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).ok()).as_ref()
        }
    };
}

pub(crate) fn is_match(pattern: Option<&Regex>, value: &str) -> bool {
    pattern.is_some_and(|re| re.is_match(value))
}

pattern!(customer_name_pattern, r"^[a-zA-Z\s'-]+$");
pattern!(sku_pattern, r"^[A-Z0-9\-_]{0,50}$");
pattern!(phone_pattern, r"^[+]?[0-9\s\-()]{0,20}$");
pattern!(username_pattern, r"^[a-zA-Z0-9_-]+$");
pattern!(
    email_pattern,
    r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$"
);
pattern!(lowercase_pattern, r"[a-z]");
pattern!(uppercase_pattern, r"[A-Z]");
pattern!(digit_pattern, r"[0-9]");
pattern!(special_pattern, r"[@$!%*?&]");

/// Checks the `local@domain.tld` shape accepted by the sign-in and customer
/// forms.
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && is_match(email_pattern(), email)
}

/// Only the hyphenated 36-character form is accepted.
pub fn is_hyphenated_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}

// =============================================================================
// Text Rule
// =============================================================================

/// Chainable checks on one text field.
///
/// Values are trimmed on construction unless built with
/// [`TextRule::untrimmed`] or [`TextRule::optional_untrimmed`]. Once a rule
/// fails, later rules do nothing.
///
/// An optional field is absent only when missing, null or exactly `""`.
/// Anything else runs the rules, so `"   "` trims to `""` and must pass them
/// before it normalizes to `None`. Lengths count UTF-16 code units, the way
/// the web form measures them.
pub(crate) struct TextRule {
    field: &'static str,
    value: Option<String>,
    optional: bool,
    failed: Option<ValidationError>,
}

impl TextRule {
    /// A field that must be present.
    pub fn required(field: &'static str, raw: &RawFields) -> Self {
        Self::build(field, raw, true, false)
    }

    /// A field that may be missing, null or `""`.
    pub fn optional(field: &'static str, raw: &RawFields) -> Self {
        Self::build(field, raw, true, true)
    }

    /// An optional field kept exactly as typed (identifiers).
    pub fn optional_untrimmed(field: &'static str, raw: &RawFields) -> Self {
        Self::build(field, raw, false, true)
    }

    /// A required field kept exactly as typed (passwords, identifiers).
    pub fn untrimmed(field: &'static str, raw: &RawFields) -> Self {
        Self::build(field, raw, false, false)
    }

    fn build(field: &'static str, raw: &RawFields, trim: bool, optional: bool) -> Self {
        let mut failed = None;
        let value = match raw.get(field) {
            Some(RawValue::Text(s)) if optional && s.is_empty() => None,
            Some(RawValue::Text(s)) if trim => Some(s.trim().to_string()),
            Some(RawValue::Text(s)) => Some(s.clone()),
            None | Some(RawValue::Null) => None,
            Some(other) => {
                failed = Some(ValidationError::WrongType {
                    field: field.to_string(),
                    message: format!("Expected string, received {}", other.type_name()),
                });
                None
            }
        };

        TextRule {
            field,
            value,
            optional,
            failed,
        }
    }

    fn fail(&mut self, error: ValidationError) {
        if self.failed.is_none() {
            self.failed = Some(error);
        }
    }

    /// Runs `check` on the present value if nothing failed yet. A missing
    /// required value fails with `Required` carrying the rule's message.
    fn apply(
        mut self,
        message: &str,
        check: impl FnOnce(&str) -> bool,
        error: impl FnOnce(String, String) -> ValidationError,
    ) -> Self {
        if self.failed.is_some() {
            return self;
        }
        match self.value.as_deref().map(check) {
            Some(true) => {}
            Some(false) => {
                let err = error(self.field.to_string(), message.to_string());
                self.fail(err);
            }
            None if !self.optional => {
                self.fail(ValidationError::Required {
                    field: self.field.to_string(),
                    message: message.to_string(),
                });
            }
            None => {}
        }
        self
    }

    /// Fails with `Required` if the value is empty.
    pub fn non_empty(self, message: &str) -> Self {
        self.apply(message, |v| !v.is_empty(), |field, message| {
            ValidationError::Required { field, message }
        })
    }

    pub fn min_chars(self, min: usize, message: &str) -> Self {
        self.apply(message, |v| utf16_len(v) >= min, |field, message| {
            ValidationError::TooShort {
                field,
                min,
                message,
            }
        })
    }

    pub fn max_chars(self, max: usize, message: &str) -> Self {
        self.apply(message, |v| utf16_len(v) <= max, |field, message| {
            ValidationError::TooLong {
                field,
                max,
                message,
            }
        })
    }

    pub fn matches(self, pattern: Option<&Regex>, message: &str) -> Self {
        self.check(|v| is_match(pattern, v), message)
    }

    /// Fails with `InvalidFormat` when `predicate` rejects the value.
    pub fn check(self, predicate: impl FnOnce(&str) -> bool, message: &str) -> Self {
        self.apply(message, predicate, |field, message| {
            ValidationError::InvalidFormat { field, message }
        })
    }

    /// Records the failure, if any, and returns the normalized value.
    ///
    /// Optional fields yield `Some(None)` when absent or blank; `None` means
    /// failed.
    pub fn finish(self, errors: &mut FieldErrors) -> Option<Option<String>> {
        match self.failed {
            Some(err) => {
                errors.record(err);
                None
            }
            None if self.value.is_none() && !self.optional => {
                errors.record(ValidationError::Required {
                    field: self.field.to_string(),
                    message: "Required".to_string(),
                });
                None
            }
            None if self.optional => Some(self.value.filter(|v| !v.is_empty())),
            None => Some(self.value),
        }
    }

    /// Like [`TextRule::finish`] for required fields.
    pub fn finish_required(self, errors: &mut FieldErrors) -> Option<String> {
        self.finish(errors).flatten()
    }
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

// =============================================================================
// Number Rule
// =============================================================================

/// Chainable checks on one numeric field.
pub(crate) struct NumberRule {
    field: &'static str,
    value: Option<f64>,
    failed: Option<ValidationError>,
}

impl NumberRule {
    /// A numeric field that must be present.
    pub fn required(field: &'static str, raw: &RawFields) -> Self {
        let (value, failed) = match raw.get(field) {
            Some(RawValue::Number(n)) if n.is_finite() => (Some(*n), None),
            Some(RawValue::Number(_)) => (
                None,
                Some(ValidationError::WrongType {
                    field: field.to_string(),
                    message: "Expected number, received nan".to_string(),
                }),
            ),
            None | Some(RawValue::Null) => (
                None,
                Some(ValidationError::Required {
                    field: field.to_string(),
                    message: "Required".to_string(),
                }),
            ),
            Some(other) => (
                None,
                Some(ValidationError::WrongType {
                    field: field.to_string(),
                    message: format!("Expected number, received {}", other.type_name()),
                }),
            ),
        };

        NumberRule {
            field,
            value,
            failed,
        }
    }

    fn apply(mut self, check: impl FnOnce(f64) -> bool, error: ValidationError) -> Self {
        if self.failed.is_none() {
            if let Some(value) = self.value {
                if !check(value) {
                    self.failed = Some(error);
                }
            }
        }
        self
    }

    pub fn integer(self, message: &str) -> Self {
        let err = ValidationError::NotInteger {
            field: self.field.to_string(),
            message: message.to_string(),
        };
        self.apply(|v| v.fract() == 0.0, err)
    }

    /// Inclusive lower bound.
    pub fn min(self, bound: f64, message: &str) -> Self {
        let err = self.out_of_range(message);
        self.apply(|v| v >= bound, err)
    }

    /// Inclusive upper bound.
    pub fn max(self, bound: f64, message: &str) -> Self {
        let err = self.out_of_range(message);
        self.apply(|v| v <= bound, err)
    }

    fn out_of_range(&self, message: &str) -> ValidationError {
        ValidationError::OutOfRange {
            field: self.field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn finish(self, errors: &mut FieldErrors) -> Option<f64> {
        match self.failed {
            Some(err) => {
                errors.record(err);
                None
            }
            None => self.value,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
