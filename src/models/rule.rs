// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Advanced data scrubbing rules.

use crate::error::FormError;
use crate::models::entry::{FieldName, FormEntry};

/// What a rule matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RuleType {
    #[default]
    CreditCard,
    Password,
    Ip,
    Imei,
    Email,
    Uuid,
    PemKey,
    UrlAuth,
    UsSsn,
    UserPath,
    Mac,
    Anything,
    /// Custom regular expression; the only type that requires `pattern`.
    Pattern,
}

impl RuleType {
    pub const ALL: [RuleType; 13] = [
        Self::CreditCard,
        Self::Password,
        Self::Ip,
        Self::Imei,
        Self::Email,
        Self::Uuid,
        Self::PemKey,
        Self::UrlAuth,
        Self::UsSsn,
        Self::UserPath,
        Self::Mac,
        Self::Anything,
        Self::Pattern,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "creditcard",
            Self::Password => "password",
            Self::Ip => "ip",
            Self::Imei => "imei",
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::PemKey => "pemkey",
            Self::UrlAuth => "url_auth",
            Self::UsSsn => "us_ssn",
            Self::UserPath => "userpath",
            Self::Mac => "mac",
            Self::Anything => "anything",
            Self::Pattern => "pattern",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit card numbers",
            Self::Password => "Password fields",
            Self::Ip => "IP addresses",
            Self::Imei => "IMEI numbers",
            Self::Email => "Email addresses",
            Self::Uuid => "UUIDs",
            Self::PemKey => "PEM keys",
            Self::UrlAuth => "Auth in URLs",
            Self::UsSsn => "US social security numbers",
            Self::UserPath => "Usernames in filepaths",
            Self::Mac => "MAC addresses",
            Self::Anything => "Anything",
            Self::Pattern => "Regex matches",
        }
    }
}

/// How matched data is redacted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MethodType {
    #[default]
    Mask,
    Remove,
    Hash,
    /// Substitute with `placeholder`.
    Replace,
}

impl MethodType {
    pub const ALL: [MethodType; 4] = [Self::Mask, Self::Remove, Self::Hash, Self::Replace];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Remove => "remove",
            Self::Hash => "hash",
            Self::Replace => "replace",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == raw)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mask => "Mask",
            Self::Remove => "Remove",
            Self::Hash => "Hash",
            Self::Replace => "Replace",
        }
    }
}

/// Editable fields of a [`Rule`], in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleField {
    Type,
    Method,
    Source,
    Placeholder,
    Pattern,
}

impl FieldName for RuleField {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Method => "method",
            Self::Source => "source",
            Self::Placeholder => "placeholder",
            Self::Pattern => "pattern",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "type" => Some(Self::Type),
            "method" => Some(Self::Method),
            "source" => Some(Self::Source),
            "placeholder" => Some(Self::Placeholder),
            "pattern" => Some(Self::Pattern),
            _ => None,
        }
    }
}

/// One data scrubbing rule: which data (`kind`) in which event location (`source`) is
/// redacted how (`method`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rule {
    pub id: u32,
    pub kind: RuleType,
    pub method: MethodType,
    /// Event selector such as `$message` or `extra.**`.
    pub source: String,
    /// Replacement text, used with [`MethodType::Replace`].
    pub placeholder: String,
    /// Regular expression, used with [`RuleType::Pattern`].
    pub pattern: String,
}

impl Rule {
    /// One-line summary, e.g. `[Mask] [Credit card numbers] from [$message]`.
    pub fn describe(&self) -> String {
        let what = match self.kind {
            RuleType::Pattern => self.pattern.clone(),
            other => other.label().to_string(),
        };
        match self.method {
            MethodType::Replace if !self.placeholder.trim().is_empty() => format!(
                "[{}] [{}] with [{}] from [{}]",
                self.method.label(),
                what,
                self.placeholder,
                self.source
            ),
            _ => format!("[{}] [{}] from [{}]", self.method.label(), what, self.source),
        }
    }
}

impl FormEntry for Rule {
    type Field = RuleField;
    type Id = u32;

    fn default_entry() -> Self {
        Self::default()
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn next_id(existing: &[Self]) -> u32 {
        existing
            .iter()
            .map(|rule| rule.id.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    fn value(&self, field: RuleField) -> &str {
        match field {
            RuleField::Type => self.kind.as_str(),
            RuleField::Method => self.method.as_str(),
            RuleField::Source => &self.source,
            RuleField::Placeholder => &self.placeholder,
            RuleField::Pattern => &self.pattern,
        }
    }

    fn set_value(&mut self, field: RuleField, value: String) -> Result<(), FormError> {
        let invalid = |value: String| FormError::InvalidValue {
            field: field.as_str(),
            value,
        };
        match field {
            RuleField::Type => self.kind = RuleType::parse(&value).ok_or_else(|| invalid(value))?,
            RuleField::Method => {
                self.method = MethodType::parse(&value).ok_or_else(|| invalid(value))?
            }
            RuleField::Source => self.source = value,
            RuleField::Placeholder => self.placeholder = value,
            RuleField::Pattern => self.pattern = value,
        }
        Ok(())
    }

    fn required_fields(&self) -> Vec<RuleField> {
        let mut required = vec![RuleField::Type, RuleField::Method, RuleField::Source];
        if self.kind == RuleType::Pattern {
            required.push(RuleField::Pattern);
        }
        required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in RuleType::ALL {
            assert_eq!(RuleType::parse(kind.as_str()), Some(kind));
        }
        for method in MethodType::ALL {
            assert_eq!(MethodType::parse(method.as_str()), Some(method));
        }
        assert_eq!(RuleType::parse("ssn"), None);
    }

    #[test]
    fn next_id_is_past_the_largest_saved_id() {
        let rules = vec![
            Rule {
                id: 4,
                ..Rule::default()
            },
            Rule {
                id: 1,
                ..Rule::default()
            },
        ];

        assert_eq!(Rule::next_id(&rules), 5);
        assert_eq!(Rule::next_id(&[]), 0);
    }

    #[test]
    fn describe_mentions_placeholder_only_for_replace() {
        let mut rule = Rule {
            source: "$message".into(),
            placeholder: "[redacted]".into(),
            ..Rule::default()
        };
        assert_eq!(
            rule.describe(),
            "[Mask] [Credit card numbers] from [$message]"
        );

        rule.method = MethodType::Replace;
        rule.kind = RuleType::Pattern;
        rule.pattern = "\\d+".into();
        assert_eq!(
            rule.describe(),
            "[Replace] [\\d+] with [[redacted]] from [$message]"
        );
    }
}
