//! Seekable, read-only byte-stream view of an encoding pass.

use std::io::{self, SeekFrom};

use crate::encode::machine::BufferEncoder;
use crate::error::{Error, Result};
use crate::options::{EncodingOptions, Indent};
use crate::value::Value;

const CLOSED: &str = "Cannot operate on a closed JSON stream";

/// Byte-addressable stream over a [`BufferEncoder`].
///
/// The encoder itself is a forward-only generator, so the stream keeps the
/// undelivered remainder of each step in a pending buffer and pulls further
/// steps on demand. Forward seeks read and discard; backward seeks reset the
/// encoder and replay from offset zero, which requires the encoded value to
/// support re-traversal. The total size of the stream is unknowable without
/// encoding everything, so seeking relative to the end is not supported.
///
/// Also usable through [`std::io::Read`] and [`std::io::Seek`].
pub struct JsonStream {
    /// The driven encoder, or `None` once the stream has been closed.
    encoder: Option<BufferEncoder>,
    /// Absolute offset of the next byte to deliver.
    cursor: u64,
    /// Bytes produced but not yet delivered, or `None` at end of stream.
    buffer: Option<Vec<u8>>,
}

impl JsonStream {
    /// Wraps a value in a stream using the default stream configuration:
    /// compact output and partial output on error.
    pub fn new(value: impl Into<Value>) -> Self {
        let mut encoder = BufferEncoder::new(value);
        encoder.set_options_unchecked(EncodingOptions::new().partial_output_on_error(true));
        encoder.set_indent_unchecked(Indent::Spaces(0));
        Self::with_encoder(encoder)
    }

    /// Wraps a configured encoder. Encoding starts lazily on first read or
    /// seek.
    pub fn with_encoder(encoder: BufferEncoder) -> Self {
        Self {
            encoder: Some(encoder),
            cursor: 0,
            buffer: Some(Vec::new()),
        }
    }

    /// Current absolute offset of bytes already delivered.
    pub fn tell(&self) -> Result<u64> {
        if self.encoder.is_none() {
            return Err(Error::InvalidState(CLOSED));
        }
        Ok(self.cursor)
    }

    /// True once the pending buffer is exhausted and the encoder is terminal.
    pub fn eof(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn is_readable(&self) -> bool {
        true
    }

    pub fn is_seekable(&self) -> bool {
        true
    }

    pub fn is_writable(&self) -> bool {
        false
    }

    /// Releases the encoder. Every subsequent operation other than reading
    /// at end of stream fails.
    pub fn close(&mut self) {
        self.encoder = None;
    }

    /// The stream is read-only; writing always fails.
    pub fn write_bytes(&mut self, _data: &[u8]) -> Result<usize> {
        Err(Error::Unsupported("Cannot write to a JSON stream"))
    }

    /// Returns up to `len` bytes, pulling further encoding steps until
    /// enough bytes are buffered or the encoder goes terminal. Fewer bytes
    /// are returned only once the entire value has been encoded.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.eof() {
            return Ok(Vec::new());
        }

        let encoder = self.encoder.as_mut().ok_or(Error::InvalidState(CLOSED))?;
        encoder.ensure_started()?;
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(Vec::new());
        };

        while buffer.len() < len && encoder.is_active() {
            if let Some(fragment) = encoder.fragment() {
                buffer.extend_from_slice(fragment.as_bytes());
            }
            encoder.step()?;
        }

        let at_end = buffer.len() <= len && !encoder.is_active();
        let output = if at_end {
            std::mem::take(buffer)
        } else {
            let tail = buffer.split_off(len);
            std::mem::replace(buffer, tail)
        };
        if at_end {
            self.buffer = None;
        }

        self.cursor += output.len() as u64;
        Ok(output)
    }

    /// Drains the pending buffer and all remaining steps, returning every
    /// byte not yet delivered.
    pub fn get_contents(&mut self) -> Result<Vec<u8>> {
        if self.eof() {
            return Ok(Vec::new());
        }

        let encoder = self.encoder.as_mut().ok_or(Error::InvalidState(CLOSED))?;
        encoder.ensure_started()?;
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(Vec::new());
        };

        while encoder.is_active() {
            if let Some(fragment) = encoder.fragment() {
                buffer.extend_from_slice(fragment.as_bytes());
            }
            encoder.step()?;
        }

        let output = std::mem::take(buffer);
        self.buffer = None;
        self.cursor += output.len() as u64;
        Ok(output)
    }

    /// Moves the cursor. Only `SeekFrom::Start` and `SeekFrom::Current` are
    /// supported; the resulting position is clamped to zero. A target before
    /// the current position resets the encoder and replays forward from
    /// offset zero.
    pub fn seek_to(&mut self, position: SeekFrom) -> Result<u64> {
        let target = match position {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => self.cursor.saturating_add_signed(delta),
            SeekFrom::End(_) => {
                return Err(Error::Unsupported(
                    "Cannot set cursor position from the end of a JSON stream",
                ));
            }
        };

        if target < self.cursor {
            self.encoder
                .as_mut()
                .ok_or(Error::InvalidState(CLOSED))?
                .reset()?;
            self.buffer = Some(Vec::new());
            self.cursor = 0;
        }

        self.forward(target)?;
        Ok(self.cursor)
    }

    /// Seeks the beginning of the stream.
    pub fn rewind(&mut self) -> Result<()> {
        self.seek_to(SeekFrom::Start(0)).map(|_| ())
    }

    /// Advances to the given position, or to the end of the stream if it is
    /// shorter, discarding every byte on the way.
    fn forward(&mut self, position: u64) -> Result<()> {
        let encoder = self.encoder.as_mut().ok_or(Error::InvalidState(CLOSED))?;
        encoder.ensure_started()?;

        while self.cursor < position {
            let Some(buffer) = self.buffer.as_mut() else {
                break;
            };
            let len = buffer.len() as u64;

            if self.cursor + len > position {
                buffer.drain(..(position - self.cursor) as usize);
                self.cursor = position;
                break;
            }

            self.cursor += len;
            buffer.clear();

            if !encoder.is_active() {
                self.buffer = None;
                break;
            }
            if let Some(fragment) = encoder.fragment() {
                buffer.extend_from_slice(fragment.as_bytes());
            }
            encoder.step()?;
        }

        Ok(())
    }
}

impl io::Read for JsonStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self.read_bytes(buf.len())?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl io::Seek for JsonStream {
    fn seek(&mut self, position: SeekFrom) -> io::Result<u64> {
        Ok(self.seek_to(position)?)
    }
}
