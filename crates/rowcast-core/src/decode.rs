use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rowcast_ingest::tokenize;
use rowcast_model::Record;

use crate::coerce::build_records;
use crate::compile::Schema;
use crate::error::DecodeError;

/// Wire formats the facade can dispatch on. Only CSV is implemented here;
/// sibling codecs honor the same field-type contract elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            _ => Err(format!("unknown data format: {}", s)),
        }
    }
}

/// Decode a raw payload against a compiled schema.
///
/// Always returns a list, single-row payloads included. Pure function of
/// (payload, schema): no I/O, no internal retries, no partial results.
pub fn decode(
    payload: &str,
    format: DataFormat,
    schema: &Schema,
) -> Result<Vec<Record>, DecodeError> {
    match format {
        DataFormat::Csv => {
            let rows = tokenize(payload, schema.dialect())?;
            let records = build_records(&rows, schema)?;
            tracing::debug!(
                service = schema.service(),
                records = records.len(),
                "decoded csv payload"
            );
            Ok(records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_round_trip() {
        assert_eq!("csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!("CSV".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::Csv.to_string(), "csv");
        assert!("yaml".parse::<DataFormat>().is_err());
    }
}
