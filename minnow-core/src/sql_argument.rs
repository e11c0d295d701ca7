use crate::{AsValue, DbType, Value};
use std::fmt::{self, Display};

/// A value bound to a statement parameter, tagged with its database type.
///
/// A null value is a legal argument, it is not the same as a missing one.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlArgument {
    value: Value,
    db_type: DbType,
}

impl SqlArgument {
    /// The database type is derived from the value variant.
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let db_type = DbType::from(&value);
        Self { value, db_type }
    }

    pub fn with_db_type(value: impl Into<Value>, db_type: DbType) -> Self {
        Self {
            value: value.into(),
            db_type,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl<T: AsValue> From<T> for SqlArgument {
    fn from(value: T) -> Self {
        SqlArgument::new(value.as_value())
    }
}

impl From<&str> for SqlArgument {
    fn from(value: &str) -> Self {
        SqlArgument::new(value)
    }
}

impl From<Value> for SqlArgument {
    fn from(value: Value) -> Self {
        SqlArgument::new(value)
    }
}

impl Display for SqlArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.value, self.db_type)
    }
}

/// Builds a `Vec<SqlArgument>` out of heterogeneous values.
///
/// ```rust
/// use minnow_core::{DbType, args};
///
/// let arguments = args!["Fred", 12, Option::<i64>::None];
/// assert_eq!(arguments.len(), 3);
/// assert_eq!(arguments[1].db_type(), DbType::Int32);
/// assert_eq!(arguments[2].db_type(), DbType::Int64);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::SqlArgument>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::SqlArgument::from($value)),+]
    };
}
