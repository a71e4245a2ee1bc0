// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! In-progress copy of one entry while its dialog is open.

use std::collections::BTreeSet;

use crate::error::FormError;
use crate::models::entry::{FieldName, FormEntry};

/// Editable entry plus the set of fields the dialog does not allow to change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft<E: FormEntry> {
    entry: E,
    disabled: BTreeSet<E::Field>,
}

impl<E: FormEntry> Draft<E> {
    /// Draft with the entry kind's baseline values and nothing locked.
    pub fn create_default() -> Self {
        Self::new(E::default_entry())
    }

    pub fn new(entry: E) -> Self {
        Self {
            entry,
            disabled: BTreeSet::new(),
        }
    }

    /// Copy every field of `existing`. With `lock_identity`, the identity field is kept but
    /// marked non-editable.
    pub fn create_from_existing(existing: &E, lock_identity: bool) -> Self {
        let disabled = if lock_identity {
            E::identity_field().into_iter().collect()
        } else {
            BTreeSet::new()
        };
        Self {
            entry: existing.clone(),
            disabled,
        }
    }

    /// New draft with `field` replaced; every other field is left as is.
    pub fn set_field(&self, field: E::Field, value: impl Into<String>) -> Result<Self, FormError> {
        if self.is_disabled(field) {
            return Err(FormError::FieldDisabled {
                field: field.as_str(),
            });
        }
        let mut next = self.clone();
        next.entry.set_value(field, value.into())?;
        Ok(next)
    }

    pub fn entry(&self) -> &E {
        &self.entry
    }

    pub fn into_entry(self) -> E {
        self.entry
    }

    pub fn is_disabled(&self, field: E::Field) -> bool {
        self.disabled.contains(&field)
    }

    pub fn disabled_fields(&self) -> impl Iterator<Item = E::Field> + '_ {
        self.disabled.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::relay::{Relay, RelayField};
    use crate::models::rule::{MethodType, Rule, RuleField, RuleType};

    #[test]
    fn default_rule_draft_uses_baseline_values() {
        let draft = Draft::<Rule>::create_default();

        assert_eq!(draft.entry().kind, RuleType::CreditCard);
        assert_eq!(draft.entry().method, MethodType::Mask);
        assert!(draft.entry().source.is_empty());
        assert!(draft.entry().pattern.is_empty());
        assert_eq!(draft.disabled_fields().count(), 0);
    }

    #[test]
    fn set_field_only_touches_the_named_field() {
        let draft = Draft::<Rule>::create_default();
        let next = draft.set_field(RuleField::Source, "$message").unwrap();

        assert_eq!(next.entry().source, "$message");
        assert_eq!(
            Rule {
                source: String::new(),
                ..next.entry().clone()
            },
            *draft.entry()
        );
        // the original draft is untouched
        assert!(draft.entry().source.is_empty());
    }

    #[test]
    fn enum_fields_reject_unknown_names() {
        let draft = Draft::<Rule>::create_default();

        let err = draft.set_field(RuleField::Method, "shred").unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidValue {
                field: "method",
                value: "shred".into()
            }
        );
    }

    #[test]
    fn existing_relay_keeps_public_key_but_locks_it() {
        let relay = Relay {
            id: "0".into(),
            name: "edge".into(),
            public_key: "key-1".into(),
            description: None,
            created: None,
            last_modified: None,
        };

        let draft = Draft::create_from_existing(&relay, true);
        assert_eq!(draft.entry(), &relay);
        assert!(draft.is_disabled(RelayField::PublicKey));

        let err = draft.set_field(RelayField::PublicKey, "key-2").unwrap_err();
        assert_eq!(err, FormError::FieldDisabled { field: "publicKey" });

        let renamed = draft.set_field(RelayField::Name, "edge-2").unwrap();
        assert_eq!(renamed.entry().public_key, "key-1");
        assert!(renamed.is_disabled(RelayField::PublicKey));
    }
}
