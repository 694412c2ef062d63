//! Schema compilation and payload decoding.
//!
//! A declaration is compiled once, at service-registration time, into an
//! immutable [`Schema`]; [`decode`] then turns raw payloads into ordered
//! lists of typed [`Record`]s against it, any number of times and from any
//! number of threads.

mod coerce;
pub mod compile;
pub mod decode;
pub mod error;

pub use compile::{CompileConfig, Schema, compile};
pub use decode::{DataFormat, decode};
pub use error::{CompileError, DecodeError};

pub use rowcast_model::Record;
