use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One decoded row: coerced values keyed by field name, in declared order,
/// plus the zero-based source row index.
///
/// Records are created by the decoder, handed to the caller, and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    row_index: usize,
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new(row_index: usize, entries: Vec<(String, Value)>) -> Self {
        Self { row_index, entries }
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Look a value up by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterate entries in declared field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
