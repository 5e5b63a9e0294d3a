//! The resumable encoding state machine.
//!
//! A recursive tree-walk is flattened into an explicit stack of frames, one
//! per open compound value, so that encoding can be driven one bounded step
//! at a time and the call stack never grows with input depth. Each `step`
//! consumes at most one element from the top frame and emits its fragments
//! through the attached [`TokenSink`].

use std::io;
use std::iter::Peekable;

use crate::encode::literal;
use crate::encode::sink::{StepBuffer, TokenSink, WriteSink};
use crate::encode::token::JsonToken;
use crate::error::{Error, Result};
use crate::options::{EncodingOptions, Indent};
use crate::value::{Key, StreamProducer, Value};

/// Encoder whose per-step output is buffered for inspection via
/// [`Encoder::fragment`]. Also iterable as a sequence of owned fragments.
pub type BufferEncoder = Encoder<StepBuffer>;

/// Encoder that forwards bytes straight to an `io::Write` target.
pub type WriterEncoder<W> = Encoder<WriteSink<W>>;

type PairIter = Box<dyn Iterator<Item = (Key, Value)>>;

/// Traversal state of one open compound value.
struct Frame {
    entries: Peekable<PairIter>,
    is_object: bool,
    /// True until the first child has been processed; suppresses the leading
    /// comma and decides whether the closer moves to its own line.
    first: bool,
}

/// Step-at-a-time JSON encoder.
///
/// The encoder is a pull-driven state machine: `reset` performs the first
/// unit of work on the stored value, each `step` performs one more, and the
/// machine goes terminal once the frame stack empties. Options and indent
/// are frozen while a pass is active. Memory use is bounded by the nesting
/// depth of the input, never by the size of the produced document.
pub struct Encoder<S: TokenSink> {
    sink: S,
    initial: Value,
    options: EncodingOptions,
    indent: String,
    indent_cache: String,
    stack: Vec<Frame>,
    errors: Vec<String>,
    newline: bool,
    line: u64,
    column: u64,
    step: Option<u64>,
    started: bool,
}

impl<S: TokenSink> Encoder<S> {
    pub fn with_sink(value: impl Into<Value>, sink: S) -> Self {
        Self {
            sink,
            initial: value.into(),
            options: EncodingOptions::default(),
            indent: Indent::default().into_unit(),
            indent_cache: String::new(),
            stack: Vec::new(),
            errors: Vec::new(),
            newline: false,
            line: 1,
            column: 1,
            step: None,
            started: false,
        }
    }

    /// Sets the encoding options. Fails while a pass is active.
    pub fn set_options(&mut self, options: EncodingOptions) -> Result<()> {
        if self.step.is_some() {
            return Err(Error::InvalidState(
                "Cannot change encoding options during encoding",
            ));
        }
        self.set_options_unchecked(options);
        Ok(())
    }

    /// Sets the indent unit for pretty-printed output. Fails while a pass is
    /// active.
    pub fn set_indent(&mut self, indent: impl Into<Indent>) -> Result<()> {
        if self.step.is_some() {
            return Err(Error::InvalidState("Cannot change indent during encoding"));
        }
        self.set_indent_unchecked(indent);
        Ok(())
    }

    pub(crate) fn set_options_unchecked(&mut self, options: EncodingOptions) {
        self.options = options;
    }

    pub(crate) fn set_indent_unchecked(&mut self, indent: impl Into<Indent>) {
        self.indent = indent.into().into_unit();
        self.indent_cache.clear();
    }

    /// Diagnostics recorded during the current pass, formatted as
    /// `Line L, column C: message`.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of steps performed since the last reset, or `None` when the
    /// machine is terminal or has never been started.
    pub fn step_index(&self) -> Option<u64> {
        self.step
    }

    pub fn is_active(&self) -> bool {
        self.step.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns the encoding to the beginning and performs the first unit of
    /// work on the stored value. A no-op when the machine is already at step
    /// zero.
    pub fn reset(&mut self) -> Result<()> {
        if self.step == Some(0) {
            return Ok(());
        }
        self.stack.clear();
        self.errors.clear();
        self.newline = false;
        self.line = 1;
        self.column = 1;
        self.step = Some(0);
        self.started = true;
        self.sink.begin_step();
        let value = self.initial.clone();
        self.process_value(value)
    }

    /// Performs one unit of encoding work: the next element of the top
    /// frame, or the closer of an exhausted frame. Transitions to terminal
    /// when the stack is empty. A never-started encoder is reset instead.
    pub fn step(&mut self) -> Result<()> {
        if !self.started {
            return self.reset();
        }
        if self.stack.is_empty() {
            self.step = None;
            return Ok(());
        }
        self.step = self.step.map(|n| n + 1);
        self.sink.begin_step();

        let (item, is_object, first) = match self.stack.last_mut() {
            Some(frame) => (frame.entries.next(), frame.is_object, frame.first),
            None => (None, false, false),
        };

        match item {
            Some((key, value)) => {
                if is_object {
                    if !self.process_key(key, first)? {
                        // Invalid key under partial output: skip the element.
                        return Ok(());
                    }
                } else if !first {
                    self.output_line(",", JsonToken::Comma)?;
                }
                if let Some(frame) = self.stack.last_mut() {
                    frame.first = false;
                }
                self.process_value(value)
            }
            None => self.pop_stack(),
        }
    }

    pub(crate) fn ensure_started(&mut self) -> Result<()> {
        if self.started { Ok(()) } else { self.reset() }
    }

    /// Handles an object key: separator, name literal and colon. Returns
    /// false when the key has no JSON representation and was skipped.
    fn process_key(&mut self, key: Key, first: bool) -> Result<bool> {
        let name = match key {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s,
            Key::Unsupported(_) => {
                self.add_error("Only string or integer keys are supported")?;
                return Ok(false);
            }
        };

        if !first {
            self.output_line(",", JsonToken::Comma)?;
        }

        let mut buf = String::with_capacity(name.len() + 2);
        literal::write_string(&mut buf, &name);
        self.output(&buf, JsonToken::Key)?;
        self.output(":", JsonToken::Separator)?;
        if self.options.pretty_print {
            self.output(" ", JsonToken::Whitespace)?;
        }

        Ok(true)
    }

    /// Resolves and dispatches one value: scalars are emitted as literals,
    /// compounds open a new frame.
    fn process_value(&mut self, value: Value) -> Result<()> {
        let value = resolve_value(value);
        match value {
            Value::Array(items) => {
                let entries: PairIter = Box::new(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| (Key::Int(index as i64), item)),
                );
                let is_object = self.options.force_object;
                self.open_frame(entries.peekable(), is_object)
            }
            Value::Object(pairs) => {
                let is_object = self.options.force_object || !is_sequential(&pairs);
                let entries: PairIter = Box::new(pairs.into_iter());
                self.open_frame(entries.peekable(), is_object)
            }
            Value::Stream(producer) => self.open_stream_frame(producer),
            scalar => {
                let mut buf = String::new();
                match literal::write_scalar(&mut buf, &scalar) {
                    Ok(()) => self.output(&buf, JsonToken::Value),
                    Err(err) => {
                        self.add_error(&err.to_string())?;
                        // Partial output substitutes a null literal.
                        self.output("null", JsonToken::Value)
                    }
                }
            }
        }
    }

    /// Classifies a forward-only cursor with a one-element lookahead: an
    /// empty cursor renders as an array, otherwise it is an object unless
    /// the first key is the integer zero. A sparse integer-keyed cursor not
    /// starting at zero therefore renders as an object; this is the
    /// accepted, reproducible policy for sources of unknown size.
    fn open_stream_frame(&mut self, producer: StreamProducer) -> Result<()> {
        let mut entries = (producer)().peekable();
        let is_object = self.options.force_object
            || entries
                .peek()
                .is_some_and(|(key, _)| *key != Key::Int(0));
        self.open_frame(entries, is_object)
    }

    fn open_frame(&mut self, entries: Peekable<PairIter>, is_object: bool) -> Result<()> {
        if is_object {
            self.output_line("{", JsonToken::OpenObject)?;
        } else {
            self.output_line("[", JsonToken::OpenArray)?;
        }
        self.stack.push(Frame {
            entries,
            is_object,
            first: true,
        });
        Ok(())
    }

    fn pop_stack(&mut self) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            self.step = None;
            return Ok(());
        };
        if !frame.first {
            self.newline = true;
        }
        if frame.is_object {
            self.output("}", JsonToken::CloseObject)
        } else {
            self.output("]", JsonToken::CloseArray)
        }
    }

    /// Records a diagnostic with the current line and column. Without
    /// `partial_output_on_error` the pass is aborted: the stack is cleared,
    /// the machine goes terminal and the formatted message is returned as an
    /// error.
    fn add_error(&mut self, message: &str) -> Result<()> {
        let formatted = format!("Line {}, column {}: {}", self.line, self.column, message);
        self.errors.push(formatted.clone());

        if self.options.partial_output_on_error {
            return Ok(());
        }

        self.stack.clear();
        self.step = None;
        Err(Error::Aborted(formatted))
    }

    /// Writes a fragment and flags the next one to start a new line when
    /// pretty-printing.
    fn output_line(&mut self, fragment: &str, token: JsonToken) -> Result<()> {
        self.output(fragment, token)?;
        self.newline = true;
        Ok(())
    }

    /// Writes a fragment to the sink, first emitting any pending newline and
    /// indentation, and advances the line/column counters.
    fn output(&mut self, fragment: &str, token: JsonToken) -> Result<()> {
        if self.newline && self.options.pretty_print {
            self.sink.write("\n", JsonToken::Whitespace)?;

            let indent_len = self.indent.len() * self.stack.len();
            if indent_len > 0 {
                while self.indent_cache.len() < indent_len {
                    self.indent_cache.push_str(&self.indent);
                }
                self.sink
                    .write(&self.indent_cache[..indent_len], JsonToken::Whitespace)?;
            }

            self.line += 1;
            self.column = indent_len as u64 + 1;
        }

        self.newline = false;
        self.sink.write(fragment, token)?;
        self.column += fragment.len() as u64;
        Ok(())
    }
}

impl Encoder<StepBuffer> {
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_sink(value, StepBuffer::new())
    }

    /// Output of the most recent `reset` or `step`, or `None` when the
    /// machine is terminal or has never been started.
    pub fn fragment(&self) -> Option<&str> {
        self.step.map(|_| self.sink.as_str())
    }

    /// Encodes the entire value, restarting from the beginning, and returns
    /// the produced JSON as one string.
    pub fn encode(&mut self) -> Result<String> {
        self.reset()?;
        let mut out = String::new();
        while self.is_active() {
            out.push_str(self.sink.as_str());
            self.step()?;
        }
        Ok(out)
    }
}

/// Drives the encoder one step per iteration, yielding each step's fragment.
/// After an error or the final fragment the iterator is fused by the
/// machine's terminal state.
impl Iterator for Encoder<StepBuffer> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.step() {
            return Some(Err(err));
        }
        self.fragment().map(|fragment| Ok(fragment.to_string()))
    }
}

impl<W: io::Write> Encoder<WriteSink<W>> {
    pub fn new(value: impl Into<Value>, writer: W) -> Self {
        Self::with_sink(value, WriteSink::new(writer))
    }

    /// Bytes written during the most recent step, or `None` when the machine
    /// is terminal or has never been started.
    pub fn step_bytes(&self) -> Option<u64> {
        self.step.map(|_| self.sink.step_bytes())
    }

    /// Encodes the entire value, restarting from the beginning, and returns
    /// the total number of bytes written.
    pub fn encode(&mut self) -> Result<u64> {
        self.reset()?;
        let mut total = 0;
        while self.is_active() {
            total += self.sink.step_bytes();
            self.step()?;
        }
        Ok(total)
    }
}

/// Repeatedly resolves deferred producers until a concrete value is reached.
/// Producers are assumed to be cycle-free.
fn resolve_value(value: Value) -> Value {
    let mut value = value;
    loop {
        match value {
            Value::Deferred(producer) => value = producer(),
            resolved => break resolved,
        }
    }
}

/// A materialized mapping renders as an array only when its keys are exactly
/// `0..n-1` in order. An empty mapping stays an object; an empty sequence is
/// already `Value::Array` and never reaches this check.
fn is_sequential(pairs: &[(Key, Value)]) -> bool {
    !pairs.is_empty()
        && pairs
            .iter()
            .enumerate()
            .all(|(index, (key, _))| *key == Key::Int(index as i64))
}
