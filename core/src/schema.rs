//! Schema validation at the trust boundary.
//!
//! # Design
//! Untyped `Value` payloads exist only momentarily: outbound payloads are
//! checked before encoding, inbound payloads immediately after envelope
//! unwrapping. [`Schema`] is the seam where `Value` becomes typed data.
//! [`TypedSchema`] is the standard implementation — the serde type *is* the
//! shape declaration. Custom implementations can report several findings at
//! once; conformance failures never change the payload (no coercion beyond
//! what the schema itself declares).

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;

/// A declarative description of the shape of `Output`.
pub trait Schema {
    type Output;

    /// Validate `value` and convert it into typed data.
    fn parse(&self, value: Value) -> Result<Self::Output, ValidationError>;

    /// Validate `value` without consuming it, discarding the typed result.
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        self.parse(value.clone()).map(|_| ())
    }
}

/// Schema backed by a serde-deserializable type.
pub struct TypedSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Schema for TypedSchema<T> {
    type Output = T;

    fn parse(&self, value: Value) -> Result<T, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::single("$", e.to_string()))
    }
}

/// Shorthand for a [`TypedSchema`] of `T`.
pub fn of<T: DeserializeOwned>() -> TypedSchema<T> {
    TypedSchema::new()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::error::Issue;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        name: String,
        quantity: u32,
    }

    #[test]
    fn conforming_payload_parses_unchanged() {
        let widget = of::<Widget>()
            .parse(json!({"name": "bolt", "quantity": 3}))
            .unwrap();
        assert_eq!(
            widget,
            Widget {
                name: "bolt".to_string(),
                quantity: 3
            }
        );
    }

    #[test]
    fn nonconforming_payload_reports_an_issue() {
        let err = of::<Widget>().parse(json!({"name": "bolt"})).unwrap_err();
        assert!(!err.issues.is_empty());
        assert_eq!(err.issues[0].path, "$");
        assert!(err.issues[0].message.contains("quantity"));
    }

    #[test]
    fn check_leaves_the_value_usable() {
        let value = json!({"name": "nut", "quantity": 1});
        of::<Widget>().check(&value).unwrap();
        assert_eq!(value["name"], "nut");
    }

    #[test]
    fn custom_schema_can_report_several_issues() {
        struct NonEmptyPair;

        impl Schema for NonEmptyPair {
            type Output = (String, String);

            fn parse(&self, value: Value) -> Result<Self::Output, ValidationError> {
                let mut issues = Vec::new();
                let first = value["first"].as_str().unwrap_or_default().to_string();
                let second = value["second"].as_str().unwrap_or_default().to_string();
                if first.is_empty() {
                    issues.push(Issue {
                        path: "$.first".to_string(),
                        message: "must be a non-empty string".to_string(),
                    });
                }
                if second.is_empty() {
                    issues.push(Issue {
                        path: "$.second".to_string(),
                        message: "must be a non-empty string".to_string(),
                    });
                }
                if issues.is_empty() {
                    Ok((first, second))
                } else {
                    Err(ValidationError::new(issues))
                }
            }
        }

        let err = NonEmptyPair.parse(json!({})).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.issues[0].path, "$.first");
        assert_eq!(err.issues[1].path, "$.second");
    }
}
