use crate::Value;
use std::fmt::{self, Display};

/// Database type tag attached to every [`crate::SqlArgument`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    AnsiString,
    Binary,
    Boolean,
    Byte,
    Currency,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    #[default]
    Object,
    SByte,
    Single,
    String,
    StringFixedLength,
    Time,
    UInt16,
    UInt32,
    UInt64,
}

impl From<&Value> for DbType {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => DbType::Object,
            Value::Boolean(..) => DbType::Boolean,
            Value::Int8(..) => DbType::SByte,
            Value::Int16(..) => DbType::Int16,
            Value::Int32(..) => DbType::Int32,
            Value::Int64(..) => DbType::Int64,
            Value::UInt8(..) => DbType::Byte,
            Value::UInt16(..) => DbType::UInt16,
            Value::UInt32(..) => DbType::UInt32,
            Value::UInt64(..) => DbType::UInt64,
            Value::Float32(..) => DbType::Single,
            Value::Float64(..) => DbType::Double,
            Value::Decimal(..) => DbType::Decimal,
            Value::Char(..) => DbType::StringFixedLength,
            Value::Varchar(..) => DbType::String,
            Value::Blob(..) => DbType::Binary,
            Value::Date(..) => DbType::Date,
            Value::Time(..) => DbType::Time,
            Value::Timestamp(..) => DbType::DateTime,
            Value::TimestampWithTimezone(..) => DbType::DateTimeOffset,
            Value::Uuid(..) => DbType::Guid,
        }
    }
}

impl Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
