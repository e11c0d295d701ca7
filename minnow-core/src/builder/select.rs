use super::{Clause, SqlBuilder, Statement};
use crate::{Mapped, MinnowError, Result, SqlArgument, SqlQuery, util::separated_by};

impl SqlBuilder {
    /// Starts a `SELECT` of the given columns.
    ///
    /// Columns are escaped for the dialect, the select wildcard is kept and
    /// expands to the mapped columns when the source is a mapped type.
    pub fn select<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.begin("select", Statement::Select, Clause::Select)?;
        let columns: Vec<String> = columns
            .into_iter()
            .map(|v| self.escape(v.as_ref()))
            .collect();
        self.projection.extend(columns);
        Ok(self)
    }

    fn push_projection(&mut self, call: &str, expression: String) -> Result<()> {
        if self.clause == Clause::Start {
            self.begin(call, Statement::Select, Clause::Select)?;
        }
        self.expect(call, &[Clause::Select])?;
        self.projection.push(expression);
        Ok(())
    }

    fn aggregate(
        mut self,
        call: &str,
        function: &str,
        column: &str,
        alias: Option<&str>,
    ) -> Result<Self> {
        let mut expression = String::with_capacity(function.len() + column.len() + 16);
        expression.push_str(function);
        expression.push('(');
        expression.push_str(&self.escape(column));
        expression.push(')');
        if let Some(alias) = alias {
            expression.push_str(" AS ");
            expression.push_str(&self.escape(alias));
        }
        self.push_projection(call, expression)?;
        Ok(self)
    }

    /// `COUNT(column)`, optionally aliased. Can start the statement.
    pub fn count<'a>(self, column: &str, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        self.aggregate("count", "COUNT", column, alias.into())
    }

    /// `COUNT(*)`.
    pub fn count_all<'a>(self, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        let wildcard = self.characters.select_wildcard;
        self.aggregate("count_all", "COUNT", wildcard, alias.into())
    }

    pub fn average<'a>(self, column: &str, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        self.aggregate("average", "AVG", column, alias.into())
    }

    pub fn max<'a>(self, column: &str, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        self.aggregate("max", "MAX", column, alias.into())
    }

    pub fn min<'a>(self, column: &str, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        self.aggregate("min", "MIN", column, alias.into())
    }

    pub fn sum<'a>(self, column: &str, alias: impl Into<Option<&'a str>>) -> Result<Self> {
        self.aggregate("sum", "SUM", column, alias.into())
    }

    /// `DISTINCT column`.
    pub fn distinct(mut self, column: &str) -> Result<Self> {
        let expression = format!("DISTINCT {}", self.escape(column));
        self.push_projection("distinct", expression)?;
        Ok(self)
    }

    /// Source table of a `SELECT` or a `DELETE`.
    pub fn from(self, table: &str) -> Result<Self> {
        self.expect("from", &[Clause::Select, Clause::Delete])?;
        let table = self.escape(table);
        self.write_source(&table, None)
    }

    /// Source table of a `SELECT` or a `DELETE`, taken from the mapping of `T`.
    pub fn from_type<T: Mapped>(self) -> Result<Self> {
        self.expect("from_type", &[Clause::Select, Clause::Delete])?;
        let info = self.registry().get::<T>()?;
        let table_info = info.table_info();
        let table = self.escape(&table_info.qualified_name());
        let columns: Vec<String> = table_info
            .columns()
            .iter()
            .map(|v| self.escape(&v.column_name))
            .collect();
        self.write_source(&table, Some(&columns))
    }

    fn write_source(mut self, table: &str, mapped: Option<&[String]>) -> Result<Self> {
        if self.clause == Clause::Delete {
            self.text.push_str("DELETE FROM ");
            self.text.push_str(table);
            self.clause = Clause::From;
            return Ok(self);
        }
        if self.projection.is_empty() {
            return Err(MinnowError::invalid_operation(
                "The select list is empty, name at least one column or aggregate",
            )
            .into());
        }
        let projection = std::mem::take(&mut self.projection);
        let wildcard = self.characters.select_wildcard;
        self.text.push_str("SELECT ");
        separated_by(
            &mut self.text,
            &projection,
            |out, column| match mapped {
                Some(mapped) if column == wildcard => {
                    separated_by(out, mapped, |out, v| out.push_str(v), ", ")
                }
                _ => out.push_str(column),
            },
            ", ",
        );
        self.text.push_str(" FROM ");
        self.text.push_str(table);
        self.clause = Clause::From;
        Ok(self)
    }

    pub(super) fn push_predicate(&mut self, operator: &str, predicate: &str) {
        self.text.push(' ');
        self.text.push_str(operator);
        self.text.push_str(" (");
        self.text.push_str(predicate);
        self.text.push(')');
        self.clause = Clause::Where;
    }

    fn free_predicate<A>(
        mut self,
        call: &str,
        allowed: &[Clause],
        operator: &str,
        predicate: &str,
        arguments: impl IntoIterator<Item = A>,
    ) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.expect(call, allowed)?;
        let predicate = self.adopt_fragment(predicate, arguments)?;
        self.push_predicate(operator, &predicate);
        Ok(self)
    }

    /// First predicate, written as is and parenthesized.
    ///
    /// The markers of the predicate are numbered from `p0`, they are shifted
    /// after the arguments already collected. Repeating a marker reuses its
    /// argument.
    pub fn where_predicate<A>(
        self,
        predicate: &str,
        arguments: impl IntoIterator<Item = A>,
    ) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.free_predicate(
            "where_predicate",
            &[Clause::From, Clause::Set],
            "WHERE",
            predicate,
            arguments,
        )
    }

    pub fn and_where<A>(self, predicate: &str, arguments: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.free_predicate("and_where", &[Clause::Where], "AND", predicate, arguments)
    }

    pub fn or_where<A>(self, predicate: &str, arguments: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.free_predicate("or_where", &[Clause::Where], "OR", predicate, arguments)
    }

    fn pending_column(
        mut self,
        call: &str,
        allowed: &[Clause],
        operator: &'static str,
        column: &str,
    ) -> Result<Self> {
        self.expect(call, allowed)?;
        if column.trim().is_empty() {
            return Err(MinnowError::argument("The column name cannot be empty").into());
        }
        self.pending = Some((operator, self.escape(column)));
        self.clause = Clause::PendingWhere;
        Ok(self)
    }

    /// First predicate on a single column, an operator call must follow.
    pub fn where_column(self, column: &str) -> Result<Self> {
        self.pending_column("where_column", &[Clause::From, Clause::Set], "WHERE", column)
    }

    pub fn and_where_column(self, column: &str) -> Result<Self> {
        self.pending_column("and_where_column", &[Clause::Where], "AND", column)
    }

    pub fn or_where_column(self, column: &str) -> Result<Self> {
        self.pending_column("or_where_column", &[Clause::Where], "OR", column)
    }

    fn exists(mut self, call: &str, operator: &str, subquery: SqlQuery) -> Result<Self> {
        self.expect(call, &[Clause::From])?;
        Self::verify_subquery(&subquery)?;
        self.text.push_str(" WHERE ");
        self.text.push_str(operator);
        self.text.push(' ');
        self.push_subquery(subquery);
        self.clause = Clause::Where;
        Ok(self)
    }

    /// `WHERE EXISTS (subquery)`, the subquery markers are shifted.
    pub fn where_exists(self, subquery: SqlQuery) -> Result<Self> {
        self.exists("where_exists", "EXISTS", subquery)
    }

    pub fn where_not_exists(self, subquery: SqlQuery) -> Result<Self> {
        self.exists("where_not_exists", "NOT EXISTS", subquery)
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_statement("group_by", Statement::Select)?;
        self.expect("group_by", &[Clause::From, Clause::Where])?;
        let columns: Vec<String> = columns
            .into_iter()
            .map(|v| self.escape(v.as_ref()))
            .collect();
        if columns.is_empty() {
            return Err(MinnowError::argument("Group by needs at least one column").into());
        }
        self.text.push_str(" GROUP BY ");
        separated_by(&mut self.text, &columns, |out, v| out.push_str(v), ", ");
        self.clause = Clause::GroupBy;
        Ok(self)
    }

    /// Written as is, without parentheses.
    pub fn having<A>(mut self, predicate: &str, arguments: impl IntoIterator<Item = A>) -> Result<Self>
    where
        A: Into<SqlArgument>,
    {
        self.expect("having", &[Clause::GroupBy])?;
        let predicate = self.adopt_fragment(predicate, arguments)?;
        self.text.push_str(" HAVING ");
        self.text.push_str(&predicate);
        self.clause = Clause::Having;
        Ok(self)
    }

    fn order_by<I, S>(mut self, call: &str, columns: I, direction: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_statement(call, Statement::Select)?;
        self.expect(
            call,
            &[
                Clause::From,
                Clause::Where,
                Clause::GroupBy,
                Clause::Having,
                Clause::OrderBy,
            ],
        )?;
        let columns: Vec<String> = columns
            .into_iter()
            .map(|v| self.escape(v.as_ref()))
            .collect();
        if columns.is_empty() {
            return Err(MinnowError::argument("Order by needs at least one column").into());
        }
        self.text.push_str(if self.clause == Clause::OrderBy {
            ", "
        } else {
            " ORDER BY "
        });
        separated_by(
            &mut self.text,
            &columns,
            |out, v| {
                out.push_str(v);
                out.push(' ');
                out.push_str(direction);
            },
            ", ",
        );
        self.clause = Clause::OrderBy;
        Ok(self)
    }

    /// Appends to the `ORDER BY` clause, opening it on the first call.
    pub fn order_by_ascending<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order_by("order_by_ascending", columns, "ASC")
    }

    pub fn order_by_descending<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order_by("order_by_descending", columns, "DESC")
    }
}
