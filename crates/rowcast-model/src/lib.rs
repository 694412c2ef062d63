//! Typed field model for schema-driven marshalling: the closed type-tag
//! registry and its coercion rules, field declarations, CSV dialect
//! configuration, and decoded records.

pub mod dialect;
pub mod error;
pub mod field;
pub mod record;
pub mod tag;
pub mod value;

pub use dialect::{DialectConfig, DialectOverrides, LineTerminator, QuoteMode};
pub use error::{CoercionError, DialectError};
pub use field::{Declaration, FieldDecl, FieldSpec, UnknownTagError};
pub use record::Record;
pub use tag::TypeTag;
pub use value::Value;
