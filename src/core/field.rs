//! Typed key-value fields for structured logging
//!
//! A [`Field`] is a key plus a tagged [`FieldValue`]. Values are rendered from
//! their tag at format time; only the `Any` variant defers to a caller-supplied
//! serializer ([`AnyValue`]).

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Type tag of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Int,
    Int64,
    Float64,
    Bool,
    Time,
    Duration,
    Error,
    Any,
}

/// Serializer escape hatch for values outside the closed set of field types.
///
/// Text output uses `fmt_text` (the `Debug` form unless overridden), JSON
/// output uses `to_json_value`.
pub trait AnyValue: fmt::Debug + Send + Sync {
    fn to_json_value(&self) -> serde_json::Result<serde_json::Value>;

    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Adapter that serializes any `serde::Serialize` value
pub struct Serialized<T>(pub T);

impl<T: fmt::Debug> fmt::Debug for Serialized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> AnyValue for Serialized<T>
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.0)
    }
}

/// Value type for structured logging fields
#[derive(Debug, Clone)]
pub enum FieldValue {
    String(String),
    Int(isize),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Time(DateTime<Local>),
    Duration(Duration),
    /// Rendered error message, `None` when no error was present
    Error(Option<String>),
    Any(Arc<dyn AnyValue>),
}

impl FieldValue {
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::String(_) => FieldType::String,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::Float64(_) => FieldType::Float64,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Time(_) => FieldType::Time,
            FieldValue::Duration(_) => FieldType::Duration,
            FieldValue::Error(_) => FieldType::Error,
            FieldValue::Any(_) => FieldType::Any,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    ///
    /// Durations become integer nanoseconds, times RFC 3339 strings and
    /// non-finite floats `null`.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        use serde_json::Value;
        let value = match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Int64(i) => Value::Number((*i).into()),
            FieldValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Time(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, false)),
            FieldValue::Duration(d) => {
                Value::Number(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX).into())
            }
            FieldValue::Error(Some(msg)) => Value::String(msg.clone()),
            FieldValue::Error(None) => Value::Null,
            FieldValue::Any(any) => any.to_json_value()?,
        };
        Ok(value)
    }
}

/// Escape newlines, carriage returns and tabs so text stays on one line
pub(crate) fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}

/// Text rendering; string and error values are escaped onto one line
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", escape_line_breaks(s)),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Int64(i) => write!(f, "{}", i),
            FieldValue::Float64(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Millis, false)),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Error(Some(msg)) => write!(f, "{}", escape_line_breaks(msg)),
            FieldValue::Error(None) => write!(f, "null"),
            FieldValue::Any(any) => any.fmt_text(f),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int64(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as isize)
    }
}

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float64(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Local>> for FieldValue {
    fn from(t: DateTime<Local>) -> Self {
        FieldValue::Time(t)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

/// A single key-value datum attached to a log record
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: isize) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Local>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// Error field under the key `error`, holding the error's message
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new("error", FieldValue::Error(Some(err.to_string())))
    }

    /// Error field with a null payload
    pub fn no_error() -> Self {
        Self::new("error", FieldValue::Error(None))
    }

    /// Field carrying any serde-serializable value
    pub fn any<T>(key: impl Into<String>, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Any(Arc::new(Serialized(value))))
    }

    /// Field carrying a value with its own serializer
    pub fn any_value(key: impl Into<String>, value: Arc<dyn AnyValue>) -> Self {
        Self::new(key, FieldValue::Any(value))
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
