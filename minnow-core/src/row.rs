use crate::{AsValue, Error, Result, Value};
use std::sync::Arc;

/// Forward-only, ordinal-addressed view over one result row.
///
/// Supplied by the driver layer. [`RowLabeled`] is the in-memory implementation.
pub trait RowCursor {
    fn field_count(&self) -> usize;
    fn name(&self, index: usize) -> &str;
    fn is_null(&self, index: usize) -> bool;
    fn value(&self, index: usize) -> Result<Value>;
    fn get<T: AsValue>(&self, index: usize) -> Result<T>
    where
        Self: Sized,
    {
        T::try_from_value(self.value(index)?)
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Case insensitive lookup.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }
}

impl<N, V> FromIterator<(N, V)> for RowLabeled
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let (labels, values): (Vec<String>, Vec<Value>) = iter
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .unzip();
        Self::new(labels.into(), values.into())
    }
}

impl RowCursor for RowLabeled {
    fn field_count(&self) -> usize {
        self.values.len()
    }

    fn name(&self, index: usize) -> &str {
        self.labels.get(index).map_or("", String::as_str)
    }

    fn is_null(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(Value::is_null)
    }

    fn value(&self, index: usize) -> Result<Value> {
        self.values.get(index).cloned().ok_or_else(|| {
            Error::msg(format!(
                "Column index {index} is out of range for a row of {} columns",
                self.values.len()
            ))
        })
    }
}
