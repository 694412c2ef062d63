//! Dialect-aware row tokenization: raw text payload in, ordered token rows
//! out. The payload is fully buffered; the tokenizer performs no I/O.

pub mod tokenizer;

pub use tokenizer::{TokenizeError, tokenize};
