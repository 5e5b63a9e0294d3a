/// Syntactic role of a fragment handed to a sink.
///
/// The kind carries no payload beyond identifying the role of the fragment;
/// sinks that need structural awareness (test probes, custom formatting
/// hooks) key off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonToken {
    /// The `[` character beginning an array.
    OpenArray,
    /// The `]` character ending an array.
    CloseArray,
    /// The `{` character beginning an object.
    OpenObject,
    /// The `}` character ending an object.
    CloseObject,
    /// The name in an object name/value pair.
    Key,
    /// The `:` character separating a name from its value.
    Separator,
    /// Any scalar value literal.
    Value,
    /// The `,` character separating elements.
    Comma,
    /// Any whitespace, including newlines and indentation.
    Whitespace,
}
