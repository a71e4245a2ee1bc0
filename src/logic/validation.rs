// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Required-field computation and per-field validation.
//!
//! Everything here is pure: callers pass the current entry and error map and get new values
//! back.

use std::collections::BTreeMap;

use crate::models::FormEntry;

/// Message attached to a required field left blank.
pub const FIELD_REQUIRED: &str = "Field Required";

/// Field name to human-readable error message.
pub type FieldErrors<F> = BTreeMap<F, String>;

/// Blank means empty after trimming whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fields that must be filled in for the entry's current discriminant.
///
/// Must be recomputed after every change since the discriminant can add or drop requirements.
pub fn required_fields<E: FormEntry>(entry: &E) -> Vec<E::Field> {
    entry.required_fields()
}

/// `true` iff every required field is non-blank.
pub fn is_form_valid<E: FormEntry>(entry: &E, required: &[E::Field]) -> bool {
    required.iter().all(|field| !is_blank(entry.value(*field)))
}

/// Re-evaluate a single field and return the resulting error map.
///
/// - blank, no error yet: set [`FIELD_REQUIRED`]
/// - blank, error present: unchanged
/// - filled, error present: error cleared
/// - filled, no error: unchanged
pub fn validate_field<E: FormEntry>(
    entry: &E,
    errors: &FieldErrors<E::Field>,
    field: E::Field,
) -> FieldErrors<E::Field> {
    let blank = is_blank(entry.value(field));
    let has_error = errors.contains_key(&field);

    match (blank, has_error) {
        (true, false) => {
            let mut next = errors.clone();
            next.insert(field, FIELD_REQUIRED.to_string());
            next
        }
        (false, true) => {
            let mut next = errors.clone();
            next.remove(&field);
            next
        }
        (true, true) | (false, false) => errors.clone(),
    }
}
