use rowcast_model::{FieldSpec, Record, Value};

use crate::compile::{AbsentPolicy, Schema};
use crate::error::DecodeError;

/// Zip token rows against the schema's input fields and build one record
/// per row. Any failure aborts the whole call; no partial result escapes.
pub(crate) fn build_records(
    rows: &[Vec<String>],
    schema: &Schema,
) -> Result<Vec<Record>, DecodeError> {
    let mut records = Vec::with_capacity(rows.len());
    for (row, tokens) in rows.iter().enumerate() {
        records.push(build_record(row, tokens, schema)?);
    }
    Ok(records)
}

fn build_record(row: usize, tokens: &[String], schema: &Schema) -> Result<Record, DecodeError> {
    let mut entries = Vec::with_capacity(schema.input_fields().len());
    for field in schema.input_fields() {
        let token = tokens.get(field.position).map(String::as_str);
        let value = coerce_field(row, field, token, schema)?;
        entries.push((field.name.clone(), value));
    }
    // Tokens beyond the declared field count carry no position; they are
    // ignored, matching the positional zip contract.
    Ok(Record::new(row, entries))
}

fn coerce_field(
    row: usize,
    field: &FieldSpec,
    token: Option<&str>,
    schema: &Schema,
) -> Result<Value, DecodeError> {
    match token {
        Some(token) if !token.is_empty() => coerce(row, field, token),
        // Optional and empty or missing: "not sent" and "sent empty" are
        // indistinguishable by contract, whatever the declared type.
        _ if !field.required => match schema.absent_policy() {
            AbsentPolicy::Sentinel => Ok(Value::Absent),
            AbsentPolicy::DefaultToken(default) => coerce(row, field, default),
        },
        Some(_) => {
            if field.tag.is_textual() {
                Ok(Value::Str(String::new()))
            } else {
                // Required non-textual fields have no empty form.
                coerce(row, field, "")
            }
        }
        None => Err(DecodeError::FieldCount {
            row,
            field: field.name.clone(),
        }),
    }
}

fn coerce(row: usize, field: &FieldSpec, token: &str) -> Result<Value, DecodeError> {
    field.tag.coerce(token).map_err(|source| DecodeError::Coercion {
        row,
        field: field.name.clone(),
        source,
    })
}
