#![doc = include_str!("../README.md")]

pub mod encode;
pub mod error;
mod number;
pub mod options;
pub mod stream;
pub mod value;

pub use crate::encode::machine::{BufferEncoder, Encoder, WriterEncoder};
pub use crate::encode::sink::{CallbackSink, StepBuffer, TokenSink, WriteSink};
pub use crate::encode::token::JsonToken;
pub use crate::error::{Error, Result};
pub use crate::options::{EncodingOptions, Indent};
pub use crate::stream::JsonStream;
pub use crate::value::{Key, Number, Value};

use std::io::Write;

/// Encodes a value with the default options: compact output, abort on the
/// first error.
pub fn encode_to_string(value: impl Into<Value>) -> Result<String> {
    encode_to_string_with(value, &EncodingOptions::default())
}

pub fn encode_to_string_with(
    value: impl Into<Value>,
    options: &EncodingOptions,
) -> Result<String> {
    let mut encoder = BufferEncoder::new(value);
    encoder.set_options(*options)?;
    encoder.encode()
}

/// Encodes a value straight to a writer, returning the number of bytes
/// written.
pub fn encode_to_writer<W: Write>(
    writer: W,
    value: impl Into<Value>,
    options: &EncodingOptions,
) -> Result<u64> {
    let mut encoder = WriterEncoder::new(value, writer);
    encoder.set_options(*options)?;
    encoder.encode()
}
