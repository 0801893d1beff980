//! Field constraint checks run by the workflows right before persistence.
//!
//! Entities declare their rules with `validator` derives and list their fields through
//! `Constrained`. Violations are turned into messages of the form
//! `validation error on field '<name>': <reason>`, in field declaration order.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// Rejects empty strings. Used with `#[validate(custom = "validate_required")]`.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn reason(code: &Cow<'static, str>) -> &'static str {
    match code.as_ref() {
        "required" => "required",
        "length" => "maximum length exceeded",
        _ => "invalid",
    }
}

/// An entity whose violations are reported in field declaration order.
pub trait Constrained: Validate {
    /// Validated field names, in declaration order.
    const FIELDS: &'static [&'static str];
}

/// Renders every field violation joined by a single space.
///
/// Fields follow their position in `order`. Fields missing from `order` come last,
/// by name.
pub fn describe(errors: &ValidationErrors, order: &[&str]) -> String {
    let rank = |field: &str| order.iter().position(|f| *f == field).unwrap_or(order.len());

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| rank(*a).cmp(&rank(*b)).then(a.cmp(b)));

    fields
        .iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| {
                format!(
                    "validation error on field '{}': {}",
                    field,
                    reason(&violation.code)
                )
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validates `entity`, mapping violations into `AppError::Validation`.
pub fn check<T: Constrained>(entity: &T) -> Result<(), AppError> {
    entity
        .validate()
        .map_err(|errors| AppError::Validation(describe(&errors, T::FIELDS)))
}
