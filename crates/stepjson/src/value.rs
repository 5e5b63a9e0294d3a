use std::fmt;
use std::rc::Rc;

/// Numeric value in a JSON tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// Key of a mapping entry. Only integer and string keys have a JSON
/// representation; anything else is reported as a recoverable encoding
/// error, carrying a type name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Int(i64),
    Str(String),
    Unsupported(&'static str),
}

/// Producer of a lazily computed value, resolved just in time by the encoder.
pub type DeferredProducer = Rc<dyn Fn() -> Value>;

/// Factory for a forward-only, single-pass cursor over key/value pairs.
/// A fresh cursor is requested for every traversal, so the factory must be
/// repeatable for the encoder to support `reset` and backward seeks.
pub type StreamProducer = Rc<dyn Fn() -> Box<dyn Iterator<Item = (Key, Value)>>>;

/// The datum being encoded as JSON.
///
/// `Object` preserves insertion order. `Deferred` and `Stream` hold shared
/// producer closures, which keeps `Value` cheaply cloneable; producers are
/// assumed to be cycle-free, which is a precondition and is not enforced.
/// `Unsupported` stands in for any type with no JSON representation, such as
/// a raw I/O handle, and carries a type name for diagnostics.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(Key, Value)>),
    Deferred(DeferredProducer),
    Stream(StreamProducer),
    Unsupported(&'static str),
}

impl Value {
    pub fn deferred<F>(producer: F) -> Value
    where
        F: Fn() -> Value + 'static,
    {
        Value::Deferred(Rc::new(producer))
    }

    pub fn stream<F, I>(producer: F) -> Value
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = (Key, Value)> + 'static,
    {
        Value::Stream(Rc::new(move || Box::new(producer())))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Object(pairs) => f.debug_tuple("Object").field(pairs).finish(),
            Value::Deferred(_) => f.write_str("Deferred(..)"),
            Value::Stream(_) => f.write_str("Stream(..)"),
            Value::Unsupported(kind) => f.debug_tuple("Unsupported").field(kind).finish(),
        }
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Key::Str(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key::Str(key)
    }
}

impl From<i64> for Key {
    fn from(key: i64) -> Self {
        Key::Int(key)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::I64(value.into()))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::I64(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::U64(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::F64(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(Key, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (Key::Str(key), value.into()))
                    .collect(),
            ),
        }
    }
}
