use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;

/// Quoting convention, a closed set mirroring the conventional CSV modes.
/// On decode only `None` changes behavior (quote characters are treated as
/// ordinary data); the others matter to the encoding side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    Minimal,
    All,
    NonNumeric,
    None,
}

impl FromStr for QuoteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(QuoteMode::Minimal),
            "all" => Ok(QuoteMode::All),
            "nonnumeric" | "non-numeric" => Ok(QuoteMode::NonNumeric),
            "none" => Ok(QuoteMode::None),
            _ => Err(format!("unknown quoting mode: {}", s)),
        }
    }
}

/// Logical row boundary. `Universal` accepts `\n`, `\r\n`, and `\r`
/// interchangeably; `Char` is a single custom terminator character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTerminator {
    Universal,
    Char(char),
}

/// Resolved tokenization parameters for one schema.
///
/// Defaults form the conventional comma-delimited, double-quoted dialect.
/// Immutable once resolved; owned by the compiled schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectConfig {
    pub delimiter: char,
    pub quote: char,
    pub escape: Option<char>,
    pub double_quote: bool,
    pub line_terminator: LineTerminator,
    pub quoting: QuoteMode,
    pub skip_initial_space: bool,
    pub strict: bool,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: None,
            double_quote: true,
            line_terminator: LineTerminator::Universal,
            quoting: QuoteMode::Minimal,
            skip_initial_space: false,
            strict: false,
        }
    }
}

/// Declared dialect overrides, applied on top of the default dialect.
///
/// String fields accept `""` as "not overridden" — declaration blocks are
/// commonly written with empty placeholders for every knob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialectOverrides {
    pub delimiter: Option<String>,
    pub quote_char: Option<String>,
    pub escape_char: Option<String>,
    pub double_quote: Option<bool>,
    pub line_terminator: Option<String>,
    pub quoting: Option<String>,
    pub skip_initial_space: Option<bool>,
    pub strict: Option<bool>,
}

impl DialectConfig {
    /// Resolve a final dialect: start from the defaults, apply overrides,
    /// validate. Fails naming the offending override field.
    pub fn resolve(overrides: &DialectOverrides) -> Result<Self, DialectError> {
        let mut dialect = DialectConfig::default();
        if let Some(ch) = single_char("delimiter", overrides.delimiter.as_deref())? {
            dialect.delimiter = ch;
        }
        if let Some(ch) = single_char("quote_char", overrides.quote_char.as_deref())? {
            dialect.quote = ch;
        }
        if let Some(ch) = single_char("escape_char", overrides.escape_char.as_deref())? {
            dialect.escape = Some(ch);
        }
        if let Some(double_quote) = overrides.double_quote {
            dialect.double_quote = double_quote;
        }
        if let Some(raw) = non_empty(overrides.line_terminator.as_deref()) {
            dialect.line_terminator = parse_terminator(raw)?;
        }
        if let Some(raw) = non_empty(overrides.quoting.as_deref()) {
            dialect.quoting = raw
                .parse::<QuoteMode>()
                .map_err(|reason| DialectError::new("quoting", reason))?;
        }
        if let Some(skip) = overrides.skip_initial_space {
            dialect.skip_initial_space = skip;
        }
        if let Some(strict) = overrides.strict {
            dialect.strict = strict;
        }
        if dialect.delimiter == dialect.quote {
            return Err(DialectError::new(
                "delimiter",
                "delimiter and quote character must differ",
            ));
        }
        Ok(dialect)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

/// A character-valued override must be exactly one ASCII character (the
/// tokenizer operates on bytes).
fn single_char(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<char>, DialectError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => Ok(Some(ch)),
        _ => Err(DialectError::new(
            field,
            format!("expected a single ASCII character, got {:?}", raw),
        )),
    }
}

fn parse_terminator(raw: &str) -> Result<LineTerminator, DialectError> {
    match raw {
        "\n" | "\r\n" | "\r" => Ok(LineTerminator::Universal),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii() => Ok(LineTerminator::Char(ch)),
                _ => Err(DialectError::new(
                    "line_terminator",
                    format!("expected a newline or a single ASCII character, got {:?}", raw),
                )),
            }
        }
    }
}
