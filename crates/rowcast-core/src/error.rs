use thiserror::Error;

use rowcast_ingest::TokenizeError;
use rowcast_model::{CoercionError, DialectError, UnknownTagError};

/// Schema compilation failure. Fatal to registration; never retried.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("duplicate field name {name:?} in {list} declaration")]
    DuplicateField { name: String, list: &'static str },
    #[error(transparent)]
    UnknownTypeTag(#[from] UnknownTagError),
    #[error(transparent)]
    Dialect(#[from] DialectError),
}

/// Decode failure. A failing decode call yields no partial result; the
/// error pinpoints the offending row and field without re-parsing.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("row {row}: required field {field:?} has no token")]
    FieldCount { row: usize, field: String },
    #[error("row {row}, field {field:?}: {source}")]
    Coercion {
        row: usize,
        field: String,
        source: CoercionError,
    },
}
