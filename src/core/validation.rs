//! Structured validation failures and shared field validators.
//!
//! Transfer objects derive [`validator::Validate`]; the derived errors are
//! flattened into a list of [`FieldMessage`]s so the response body carries one
//! message per offending field.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::DbId;

/// One message attached to one field of a transfer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field_name: String,
    pub message: String,
}

/// A validation failure with per-field messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub errors: Vec<FieldMessage>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.add(field, message);
        error
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldMessage {
            field_name: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when no messages were collected, the error itself otherwise
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field_name == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field_name, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = ValidationError::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                result.add(field.to_string(), message);
            }
        }
        // HashMap iteration order is unstable
        result
            .errors
            .sort_by(|a, b| a.field_name.cmp(&b.field_name).then(a.message.cmp(&b.message)));
        result
    }
}

/// Run derived validation and convert the outcome into a [`ValidationError`]
pub fn validate<T: validator::Validate>(value: &T) -> Result<(), ValidationError> {
    value.validate().map_err(ValidationError::from)
}

/// Ids of embedded relation references in payload order, duplicates removed.
/// A reference without an id is reported on `field`.
pub fn reference_ids(
    field: &str,
    ids: impl IntoIterator<Item = Option<DbId>>,
) -> Result<Vec<DbId>, ValidationError> {
    let mut unique: Vec<DbId> = Vec::new();
    for id in ids {
        let Some(id) = id else {
            return Err(ValidationError::single(field, "Each reference must carry an id"));
        };
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    Ok(unique)
}

fn field_error(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Price and similar amounts may be zero but never negative
pub fn non_negative(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(field_error("non_negative", "Value must not be negative"));
    }
    Ok(())
}

/// Release dates cannot be in the future
pub fn past_or_present(value: &DateTime<Utc>) -> Result<(), validator::ValidationError> {
    if *value > Utc::now() {
        return Err(field_error("past_or_present", "Date cannot be in the future"));
    }
    Ok(())
}

/// Largest price magnitude a `DECIMAL(12,2)` column holds, exclusive
const PRICE_LIMIT: i64 = 10_000_000_000;

/// Price fits the stored column: non-negative, at most two decimal places
/// and below ten billion
pub fn valid_price(value: &Decimal) -> Result<(), validator::ValidationError> {
    non_negative(value)?;
    if value.normalize().scale() > 2 {
        return Err(field_error("price_scale", "Price must have at most 2 decimal places"));
    }
    if *value >= Decimal::from(PRICE_LIMIT) {
        return Err(field_error("price_range", "Price must be less than 10000000000"));
    }
    Ok(())
}

/// Release date lies within the stored timestamp range and not in the future
pub fn valid_release_date(value: &DateTime<Utc>) -> Result<(), validator::ValidationError> {
    // TIMESTAMP columns start one second after the Unix epoch
    if value.timestamp() < 1 {
        return Err(field_error("date_range", "Date must be after 1970-01-01"));
    }
    past_or_present(value)
}

/// Rejects strings made only of whitespace
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("not_blank", "Required field"));
    }
    Ok(())
}
