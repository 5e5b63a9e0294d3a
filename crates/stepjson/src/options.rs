/// JSON encoding options.
///
/// All options default to off: compact output, arrays rendered as arrays and
/// the pass aborted on the first encoding error. Options are frozen once an
/// encoding pass has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodingOptions {
    /// Insert newlines, indentation and key/value spacing.
    pub pretty_print: bool,
    /// Render every compound value as an object, keying sequences by index.
    pub force_object: bool,
    /// Substitute safe defaults and keep encoding past recoverable errors
    /// instead of aborting the pass.
    pub partial_output_on_error: bool,
}

impl EncodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty_print(mut self, enabled: bool) -> Self {
        self.pretty_print = enabled;
        self
    }

    pub fn force_object(mut self, enabled: bool) -> Self {
        self.force_object = enabled;
        self
    }

    pub fn partial_output_on_error(mut self, enabled: bool) -> Self {
        self.partial_output_on_error = enabled;
        self
    }
}

/// Indent unit for pretty-printed output, repeated once per nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    /// A number of space characters (default: 4).
    Spaces(usize),
    /// An arbitrary literal string, such as a tab.
    Literal(String),
}

impl Indent {
    pub(crate) fn into_unit(self) -> String {
        match self {
            Indent::Spaces(count) => " ".repeat(count),
            Indent::Literal(unit) => unit,
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(4)
    }
}

impl From<usize> for Indent {
    fn from(count: usize) -> Self {
        Indent::Spaces(count)
    }
}

impl From<i32> for Indent {
    fn from(count: i32) -> Self {
        Indent::Spaces(count.max(0) as usize)
    }
}

impl From<&str> for Indent {
    fn from(unit: &str) -> Self {
        Indent::Literal(unit.to_string())
    }
}

impl From<String> for Indent {
    fn from(unit: String) -> Self {
        Indent::Literal(unit)
    }
}
