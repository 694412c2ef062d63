use thiserror::Error;

use crate::tag::TypeTag;

/// A token could not be parsed under its declared type tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot coerce {token:?} as {tag}: {reason}")]
pub struct CoercionError {
    pub tag: TypeTag,
    pub token: String,
    pub reason: String,
}

/// A dialect override failed validation. Names the offending override field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid dialect override {field:?}: {reason}")]
pub struct DialectError {
    pub field: &'static str,
    pub reason: String,
}

impl DialectError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
