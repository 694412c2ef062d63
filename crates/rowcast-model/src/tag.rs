use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoercionError;
use crate::value::Value;

/// Closed registry of field value types.
///
/// Each tag selects one coercion rule from raw token to [`Value`]. `Str` is
/// the default for untagged declarations; `Text` is its semantic alias.
/// `AsIs` marks a value exempt from any later re-typing and `Opaque`
/// additionally exempts it from introspection (it may carry sensitive
/// content, so its tokens are never echoed into logs or error messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Str,
    Text,
    AsIs,
    Opaque,
    Int,
    Float,
    Decimal,
    Bool,
    Date,
    DateTime,
    Uuid,
}

impl TypeTag {
    /// Tags whose coercion is the verbatim string. A required field of a
    /// textual tag may legally carry an empty token (decoding to `""`).
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            TypeTag::Str | TypeTag::Text | TypeTag::AsIs | TypeTag::Opaque
        )
    }

    /// Opaque values are exempt from introspection and redaction logic.
    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeTag::Opaque)
    }

    /// Parse one raw token under this tag's coercion rule.
    pub fn coerce(&self, token: &str) -> Result<Value, CoercionError> {
        match self {
            TypeTag::Str | TypeTag::Text | TypeTag::AsIs | TypeTag::Opaque => {
                Ok(Value::Str(token.to_string()))
            }
            TypeTag::Int => token
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|err| self.fail(token, err.to_string())),
            TypeTag::Float => token
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|err| self.fail(token, err.to_string())),
            TypeTag::Decimal => rust_decimal::Decimal::from_str_exact(token)
                .map(Value::Decimal)
                .map_err(|err| self.fail(token, err.to_string())),
            TypeTag::Bool => parse_bool(token)
                .map(Value::Bool)
                .ok_or_else(|| self.fail(token, "not a recognized boolean literal")),
            TypeTag::Date => NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|err| self.fail(token, err.to_string())),
            TypeTag::DateTime => parse_datetime(token)
                .map(Value::DateTime)
                .map_err(|reason| self.fail(token, reason)),
            TypeTag::Uuid => Uuid::parse_str(token)
                .map(Value::Uuid)
                .map_err(|err| self.fail(token, err.to_string())),
        }
    }

    fn fail(&self, token: &str, reason: impl Into<String>) -> CoercionError {
        CoercionError {
            tag: *self,
            // Never echo an opaque token back to the caller.
            token: if self.is_opaque() {
                "<opaque>".to_string()
            } else {
                token.to_string()
            },
            reason: reason.into(),
        }
    }

    /// Canonical lower-case tag name as used in textual declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Str => "string",
            TypeTag::Text => "text",
            TypeTag::AsIs => "asis",
            TypeTag::Opaque => "opaque",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::Bool => "bool",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Uuid => "uuid",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    /// Parse a tag name from configuration text (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(TypeTag::Str),
            "text" => Ok(TypeTag::Text),
            "asis" | "as_is" | "as-is" => Ok(TypeTag::AsIs),
            "opaque" => Ok(TypeTag::Opaque),
            "int" | "integer" => Ok(TypeTag::Int),
            "float" => Ok(TypeTag::Float),
            "decimal" => Ok(TypeTag::Decimal),
            "bool" | "boolean" => Ok(TypeTag::Bool),
            "date" => Ok(TypeTag::Date),
            "datetime" | "date-time" => Ok(TypeTag::DateTime),
            "uuid" => Ok(TypeTag::Uuid),
            _ => Err(format!("unknown type tag: {}", s)),
        }
    }
}

/// Boolean literal set accepted by the `Bool` tag, case-insensitive.
fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// ISO-8601 timestamp, with or without an offset. A trailing `Z` and
/// fractional seconds are accepted; an offset-less timestamp is taken as UTC.
fn parse_datetime(token: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(token) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(token, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| err.to_string())
}
