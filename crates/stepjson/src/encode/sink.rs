//! Sinks consume the (fragment, token kind) pairs emitted by the encoder.

use std::io;

use crate::encode::token::JsonToken;
use crate::error::Result;

/// Consumer of encoder output.
///
/// `begin_step` runs at the start of every unit of work, before any fragment
/// of that step is written, so sinks can maintain per-step state.
pub trait TokenSink {
    fn begin_step(&mut self) {}

    fn write(&mut self, fragment: &str, token: JsonToken) -> Result<()>;
}

/// Accumulates the fragments of the current step into a single string,
/// discarding the previous step's output each time. This is what turns the
/// encoder into a resumable generator of per-step chunks.
#[derive(Debug, Default)]
pub struct StepBuffer {
    buffer: String,
}

impl StepBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl TokenSink for StepBuffer {
    fn begin_step(&mut self) {
        self.buffer.clear();
    }

    fn write(&mut self, fragment: &str, _token: JsonToken) -> Result<()> {
        self.buffer.push_str(fragment);
        Ok(())
    }
}

/// Forwards every fragment straight to an `io::Write` target, tallying the
/// bytes written in the current step.
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
    step_bytes: u64,
}

impl<W: io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            step_bytes: 0,
        }
    }

    /// Bytes written during the current step.
    pub fn step_bytes(&self) -> u64 {
        self.step_bytes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriteSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> TokenSink for WriteSink<W> {
    fn begin_step(&mut self) {
        self.step_bytes = 0;
    }

    fn write(&mut self, fragment: &str, _token: JsonToken) -> Result<()> {
        self.writer.write_all(fragment.as_bytes())?;
        self.step_bytes += fragment.len() as u64;
        Ok(())
    }
}

/// Passes every fragment and its token kind to a caller-supplied callback.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F: FnMut(&str, JsonToken)> CallbackSink<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&str, JsonToken)> TokenSink for CallbackSink<F> {
    fn write(&mut self, fragment: &str, token: JsonToken) -> Result<()> {
        (self.callback)(fragment, token);
        Ok(())
    }
}
