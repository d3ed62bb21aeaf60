use crate::Result;

use chrono::{DateTime, Utc};

/// A single column value carried by a [`Record`](crate::Record).
///
/// `Null` is an explicit SQL NULL, distinct from a key that is absent from
/// the record. `RawSql` carries a literal SQL expression that must be
/// rendered verbatim and never passed as a bind parameter.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Explicit SQL NULL
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Binary (LOB) value
    Bytes(Vec<u8>),

    /// Timestamp value
    Timestamp(DateTime<Utc>),

    /// A literal SQL expression, rendered unquoted and unbound
    RawSql(String),
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    /// The sentinel "unset" timestamp, analogous to a zero time value.
    ///
    /// Timestamp-classified columns holding this value render as SQL NULL
    /// in UPDATE SET positions.
    pub const fn zero_timestamp() -> Self {
        Self::Timestamp(DateTime::<Utc>::MIN_UTC)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_raw_sql(&self) -> bool {
        matches!(self, Self::RawSql(_))
    }

    /// True for `Null` and for the zero/unset timestamp.
    pub fn is_null_or_zero_time(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Timestamp(t) => *t == DateTime::<Utc>::MIN_UTC,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            _ => Err(crate::err!("cannot convert value to i64; value={self:#?}")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(crate::err!("cannot convert value to String; value={self:#?}")),
        }
    }

    pub fn to_option_i64(self) -> Result<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            Self::I64(v) => Ok(Some(v)),
            _ => Err(crate::err!("cannot convert value to i64; value={self:#?}")),
        }
    }

    pub fn to_option_string(self) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::String(v) => Ok(Some(v)),
            _ => Err(crate::err!("cannot convert value to String; value={self:#?}")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Self {
        Self::Timestamp(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
