use super::{Clause, SqlBuilder};
use crate::{MinnowError, Result, SqlArgument, SqlQuery, util::separated_by};

/// Operators completing a `where_column`, `and_where_column` or
/// `or_where_column` call.
impl SqlBuilder {
    fn complete(mut self, call: &str, write: impl FnOnce(&mut Self)) -> Result<Self> {
        self.expect(call, &[Clause::PendingWhere])?;
        let Some((operator, column)) = self.pending.take() else {
            return Err(MinnowError::invalid_operation(format!(
                "`{call}` needs a column, call `where_column` first"
            ))
            .into());
        };
        self.text.push(' ');
        self.text.push_str(operator);
        self.text.push_str(" (");
        self.text.push_str(&column);
        write(&mut self);
        self.text.push(')');
        self.clause = Clause::Where;
        Ok(self)
    }

    fn compare(self, call: &str, operator: &str, value: impl Into<SqlArgument>) -> Result<Self> {
        self.complete(call, |builder| {
            builder.text.push(' ');
            builder.text.push_str(operator);
            builder.text.push(' ');
            builder.push_argument(value);
        })
    }

    fn range(
        self,
        call: &str,
        operator: &str,
        lower: impl Into<SqlArgument>,
        upper: impl Into<SqlArgument>,
    ) -> Result<Self> {
        self.complete(call, |builder| {
            builder.text.push(' ');
            builder.text.push_str(operator);
            builder.text.push(' ');
            builder.push_argument(lower);
            builder.text.push_str(" AND ");
            builder.push_argument(upper);
        })
    }

    fn list<A>(self, call: &str, operator: &str, values: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        let values: Vec<SqlArgument> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(MinnowError::argument(format!("`{call}` needs at least one value")).into());
        }
        self.complete(call, |builder| {
            builder.text.push(' ');
            builder.text.push_str(operator);
            builder.text.push_str(" (");
            let first = builder.arguments.len();
            let parameters: Vec<String> = (first..first + values.len())
                .map(|i| builder.characters.get_parameter_name(i))
                .collect();
            separated_by(&mut builder.text, &parameters, |out, v| out.push_str(v), ", ");
            builder.arguments.extend(values);
            builder.text.push(')');
        })
    }

    fn subquery(self, call: &str, operator: &str, subquery: SqlQuery) -> Result<Self> {
        Self::verify_subquery(&subquery)?;
        self.complete(call, |builder| {
            builder.text.push(' ');
            builder.text.push_str(operator);
            builder.text.push(' ');
            builder.push_subquery(subquery);
        })
    }

    pub fn between(
        self,
        lower: impl Into<SqlArgument>,
        upper: impl Into<SqlArgument>,
    ) -> Result<Self> {
        self.range("between", "BETWEEN", lower, upper)
    }

    pub fn not_between(
        self,
        lower: impl Into<SqlArgument>,
        upper: impl Into<SqlArgument>,
    ) -> Result<Self> {
        self.range("not_between", "NOT BETWEEN", lower, upper)
    }

    /// `column IN (..)`, one marker per value. The list cannot be empty.
    pub fn in_values<A>(self, values: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.list("in_values", "IN", values)
    }

    pub fn not_in_values<A>(self, values: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.list("not_in_values", "NOT IN", values)
    }

    /// `column IN (subquery)`, the subquery markers are shifted.
    pub fn in_query(self, subquery: SqlQuery) -> Result<Self> {
        self.subquery("in_query", "IN", subquery)
    }

    pub fn not_in_query(self, subquery: SqlQuery) -> Result<Self> {
        self.subquery("not_in_query", "NOT IN", subquery)
    }

    pub fn is_equal_to(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_equal_to", "=", value)
    }

    pub fn is_not_equal_to(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_not_equal_to", "<>", value)
    }

    pub fn is_greater_than(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_greater_than", ">", value)
    }

    pub fn is_greater_than_or_equal_to(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_greater_than_or_equal_to", ">=", value)
    }

    pub fn is_less_than(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_less_than", "<", value)
    }

    pub fn is_less_than_or_equal_to(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_less_than_or_equal_to", "<=", value)
    }

    pub fn is_like(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_like", "LIKE", value)
    }

    pub fn is_not_like(self, value: impl Into<SqlArgument>) -> Result<Self> {
        self.compare("is_not_like", "NOT LIKE", value)
    }

    pub fn is_null(self) -> Result<Self> {
        self.complete("is_null", |builder| builder.text.push_str(" IS NULL"))
    }

    pub fn is_not_null(self) -> Result<Self> {
        self.complete("is_not_null", |builder| builder.text.push_str(" IS NOT NULL"))
    }
}
