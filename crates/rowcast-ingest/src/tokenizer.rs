use csv::{ReaderBuilder, Terminator};
use thiserror::Error;

use rowcast_model::{DialectConfig, LineTerminator, QuoteMode};

#[derive(Debug, Error)]
pub enum TokenizeError {
    /// Strict mode only: a closing quote was followed by something other
    /// than a delimiter, a row boundary, or end of input.
    #[error("malformed quoting in row {row}")]
    MalformedQuoting { row: usize },
    #[error("csv read error: {0}")]
    Read(#[from] csv::Error),
}

/// Split a fully-buffered payload into ordered token rows per the dialect.
///
/// Rows are bounded by the configured line terminator, tokens by the
/// delimiter; quoted tokens may embed both. Blank lines produce no row; a
/// quoted empty token does.
pub fn tokenize(
    payload: &str,
    dialect: &DialectConfig,
) -> Result<Vec<Vec<String>>, TokenizeError> {
    // Spaces immediately after a delimiter are not data. They go away
    // before quote handling, so a quote that follows them still opens a
    // quoted token and spaces inside quotes stay untouched.
    let stripped;
    let payload = if dialect.skip_initial_space {
        stripped = strip_initial_spaces(payload, dialect);
        stripped.as_str()
    } else {
        payload
    };

    if dialect.strict && dialect.quoting != QuoteMode::None {
        check_quote_discipline(payload, dialect)?;
    }

    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(dialect.delimiter as u8)
        .quote(dialect.quote as u8)
        .double_quote(dialect.double_quote)
        .escape(dialect.escape.map(|ch| ch as u8))
        .quoting(dialect.quoting != QuoteMode::None)
        .terminator(match dialect.line_terminator {
            LineTerminator::Universal => Terminator::CRLF,
            LineTerminator::Char(ch) => Terminator::Any(ch as u8),
        });

    let mut reader = builder.from_reader(payload.as_bytes());
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    tracing::debug!(rows = rows.len(), "tokenized payload");
    Ok(rows)
}

#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
}

/// Remove spaces that immediately follow a delimiter, outside quoted
/// tokens. Spaces at the start of a line are data, spaces inside quotes
/// are data, spaces between a delimiter and an opening quote are not.
fn strip_initial_spaces(payload: &str, dialect: &DialectConfig) -> String {
    let quote_enabled = dialect.quoting != QuoteMode::None;
    let is_boundary = |ch: char| match dialect.line_terminator {
        LineTerminator::Universal => ch == '\n' || ch == '\r',
        LineTerminator::Char(term) => ch == term,
    };

    let mut out = String::with_capacity(payload.len());
    let mut state = ScanState::FieldStart;
    let mut after_delimiter = false;
    let mut chars = payload.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::FieldStart => {
                if after_delimiter && ch == ' ' {
                    continue;
                }
                after_delimiter = false;
                out.push(ch);
                if quote_enabled && ch == dialect.quote {
                    state = ScanState::Quoted;
                } else if ch == dialect.delimiter {
                    after_delimiter = true;
                } else if !is_boundary(ch) {
                    state = ScanState::Unquoted;
                }
            }
            ScanState::Unquoted => {
                out.push(ch);
                if ch == dialect.delimiter {
                    state = ScanState::FieldStart;
                    after_delimiter = true;
                } else if is_boundary(ch) {
                    state = ScanState::FieldStart;
                }
            }
            ScanState::Quoted => {
                out.push(ch);
                if dialect.escape == Some(ch) && ch != dialect.quote {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if ch == dialect.quote {
                    if dialect.double_quote && chars.peek() == Some(&dialect.quote) {
                        out.push(dialect.quote);
                        chars.next();
                    } else {
                        state = ScanState::Unquoted;
                    }
                }
            }
        }
    }
    out
}

/// Pre-scan enforcing quote discipline for strict dialects. The tolerant
/// reader accepts stray characters after a closing quote; strict mode
/// rejects the row instead. A quote character inside an unquoted token is
/// literal data either way.
fn check_quote_discipline(
    payload: &str,
    dialect: &DialectConfig,
) -> Result<(), TokenizeError> {
    let quote = dialect.quote;
    let delimiter = dialect.delimiter;
    let escape = dialect.escape;
    let is_boundary = |ch: char| match dialect.line_terminator {
        LineTerminator::Universal => ch == '\n' || ch == '\r',
        LineTerminator::Char(term) => ch == term,
    };

    let mut row = 0usize;
    let mut state = ScanState::FieldStart;
    let mut chars = payload.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            ScanState::FieldStart => {
                if ch == quote {
                    state = ScanState::Quoted;
                } else if ch == delimiter {
                    // empty token, next field
                } else if is_boundary(ch) {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row += 1;
                } else {
                    state = ScanState::Unquoted;
                }
            }
            ScanState::Unquoted => {
                if ch == delimiter {
                    state = ScanState::FieldStart;
                } else if is_boundary(ch) {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row += 1;
                    state = ScanState::FieldStart;
                }
            }
            ScanState::Quoted => {
                if escape == Some(ch) && ch != quote {
                    chars.next();
                } else if ch == quote {
                    match chars.peek().copied() {
                        Some(next) if next == quote && dialect.double_quote => {
                            chars.next();
                        }
                        Some(next) if next == delimiter => {
                            chars.next();
                            state = ScanState::FieldStart;
                        }
                        Some(next) if is_boundary(next) => {
                            chars.next();
                            if next == '\r' && chars.peek() == Some(&'\n') {
                                chars.next();
                            }
                            row += 1;
                            state = ScanState::FieldStart;
                        }
                        None => state = ScanState::FieldStart,
                        Some(_) => return Err(TokenizeError::MalformedQuoting { row }),
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_dialect() -> DialectConfig {
        DialectConfig::default()
    }

    #[test]
    fn splits_rows_and_tokens() {
        let rows = tokenize("a,b,c\nd,e,f", &default_dialect()).expect("tokenize");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn keeps_empty_tokens() {
        let rows = tokenize("a,,c", &default_dialect()).expect("tokenize");
        assert_eq!(rows, vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn strict_scan_counts_rows() {
        let mut dialect = default_dialect();
        dialect.strict = true;
        let err = tokenize("ok,row\n\"bad\"junk,x", &dialect).unwrap_err();
        match err {
            TokenizeError::MalformedQuoting { row } => assert_eq!(row, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn space_stripping_leaves_quoted_spans_alone() {
        let mut dialect = default_dialect();
        dialect.skip_initial_space = true;
        assert_eq!(
            strip_initial_spaces("a, \"b, c\", d", &dialect),
            "a,\"b, c\",d"
        );
        assert_eq!(
            strip_initial_spaces("a, \"say \"\" hi\"", &dialect),
            "a,\"say \"\" hi\""
        );
    }
}
