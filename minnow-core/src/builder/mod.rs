//! Fluent construction of parameterized statements.
//!
//! ```rust
//! use minnow_core::{SqlBuilder, SqlCharacters, args};
//!
//! let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
//!     .select(["Name", "DateOfBirth"])?
//!     .from("Sales.Customers")?
//!     .where_predicate("Name LIKE @p0", args!["Fr%"])?
//!     .and_where_column("StatusId")?
//!     .in_values(args![1, 2])?
//!     .order_by_descending(["DateOfBirth"])?
//!     .to_sql_query()?;
//! assert_eq!(
//!     query.command_text(),
//!     "SELECT [Name], [DateOfBirth] FROM [Sales].[Customers] WHERE (Name LIKE @p0) \
//!      AND ([StatusId] IN (@p1, @p2)) ORDER BY [DateOfBirth] DESC",
//! );
//! assert_eq!(query.arguments().len(), 3);
//! # Ok::<(), minnow_core::Error>(())
//! ```

mod crud;
mod predicate;
mod select;
mod write;

use crate::{
    MinnowError, ObjectInfoRegistry, Result, SqlArgument, SqlCharacters, SqlQuery,
    sql_utility::{renumber_parameters, verify_arguments},
    util::separated_by,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statement {
    Select,
    Insert,
    Update,
    Delete,
    Execute,
}

/// Position of the builder inside its statement, decides which calls are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Start,
    Select,
    From,
    Where,
    /// A column was named, an operator must follow.
    PendingWhere,
    GroupBy,
    Having,
    OrderBy,
    Insert,
    Into,
    Update,
    Set,
    Delete,
    Execute,
}

/// Builds one SQL statement clause by clause.
///
/// Every call checks it is legal at the current position and fails with
/// [`MinnowError::InvalidOperation`] otherwise. Arguments are collected as the
/// statement grows, parameter markers are named after their position using
/// the dialect of the builder.
#[derive(Clone)]
pub struct SqlBuilder {
    characters: SqlCharacters,
    registry: Option<Arc<ObjectInfoRegistry>>,
    statement: Option<Statement>,
    clause: Clause,
    text: String,
    arguments: Vec<SqlArgument>,
    /// Select list, written once the source is known.
    projection: Vec<String>,
    /// Insert column list.
    columns: Vec<String>,
    /// Insert values aligned with `columns`, `None` takes the next argument.
    expressions: Vec<Option<String>>,
    /// Operator and escaped column of an incomplete predicate.
    pending: Option<(&'static str, String)>,
}

impl SqlBuilder {
    /// Builder using [`SqlCharacters::EMPTY`] and the global registry.
    pub fn new() -> Self {
        Self::with_characters(SqlCharacters::EMPTY)
    }

    pub fn with_characters(characters: SqlCharacters) -> Self {
        Self {
            characters,
            registry: None,
            statement: None,
            clause: Clause::Start,
            text: String::with_capacity(128),
            arguments: Vec::new(),
            projection: Vec::new(),
            columns: Vec::new(),
            expressions: Vec::new(),
            pending: None,
        }
    }

    /// Resolves mapped types through `registry` instead of the global one.
    pub fn with_registry(mut self, registry: Arc<ObjectInfoRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn characters(&self) -> &SqlCharacters {
        &self.characters
    }

    pub fn arguments(&self) -> &[SqlArgument] {
        &self.arguments
    }

    fn registry(&self) -> Arc<ObjectInfoRegistry> {
        self.registry.clone().unwrap_or_else(ObjectInfoRegistry::global)
    }

    fn expect(&self, call: &str, allowed: &[Clause]) -> Result<()> {
        if allowed.contains(&self.clause) {
            Ok(())
        } else {
            Err(MinnowError::invalid_operation(format!(
                "`{call}` cannot follow {}",
                self.position()
            ))
            .into())
        }
    }

    fn expect_statement(&self, call: &str, statement: Statement) -> Result<()> {
        if self.statement == Some(statement) {
            Ok(())
        } else {
            Err(MinnowError::invalid_operation(format!(
                "`{call}` cannot follow {}",
                self.position()
            ))
            .into())
        }
    }

    fn position(&self) -> String {
        match (self.statement, self.clause) {
            (None, _) => "a new builder".into(),
            (Some(statement), clause) => format!("the {clause:?} clause of {statement:?}"),
        }
    }

    fn begin(&mut self, call: &str, statement: Statement, clause: Clause) -> Result<()> {
        self.expect(call, &[Clause::Start])?;
        self.statement = Some(statement);
        self.clause = clause;
        Ok(())
    }

    /// Name of the marker for the next argument.
    fn next_parameter(&self) -> String {
        self.characters.get_parameter_name(self.arguments.len())
    }

    fn push_argument(&mut self, value: impl Into<SqlArgument>) {
        let parameter = self.next_parameter();
        self.text.push_str(&parameter);
        self.arguments.push(value.into());
    }

    fn escape(&self, identifier: &str) -> String {
        self.characters.escape_sql(identifier)
    }

    /// Validates a caller supplied fragment against its arguments and shifts
    /// its markers after the arguments already collected.
    fn adopt_fragment<A>(
        &mut self,
        fragment: &str,
        arguments: impl IntoIterator<Item = A>,
    ) -> Result<String>
    where
        A: Into<SqlArgument>,
    {
        if fragment.trim().is_empty() {
            return Err(MinnowError::argument("The predicate cannot be empty").into());
        }
        let arguments: Vec<SqlArgument> = arguments.into_iter().map(Into::into).collect();
        verify_arguments(
            fragment,
            arguments.len(),
            format_args!("The predicate `{}`", crate::truncate_long!(fragment)),
        )?;
        self.arguments.extend(arguments);
        Ok(renumber_parameters(fragment, self.arguments.len()))
    }

    fn verify_subquery(subquery: &SqlQuery) -> Result<()> {
        verify_arguments(
            subquery.command_text(),
            subquery.arguments().len(),
            format_args!("The subquery `{subquery}`"),
        )
    }

    /// Appends a subquery, renumbered after the arguments already collected.
    /// Verify it first with [`Self::verify_subquery`].
    fn push_subquery(&mut self, subquery: SqlQuery) {
        let (text, arguments) = subquery.into_parts();
        self.arguments.extend(arguments);
        self.text.push('(');
        self.text
            .push_str(&renumber_parameters(&text, self.arguments.len()));
        self.text.push(')');
    }

    /// The finished statement.
    ///
    /// Fails when the statement is incomplete: no statement started, a select
    /// or delete without source, an insert without values, an update without
    /// assignments or a predicate still waiting for its operator.
    pub fn to_sql_query(&self) -> Result<SqlQuery> {
        let incomplete = |what: &str| -> Result<SqlQuery> {
            Err(MinnowError::invalid_operation(format!(
                "The statement is incomplete, {what}"
            ))
            .into())
        };
        match self.clause {
            Clause::Start => return incomplete("no statement was started"),
            Clause::Select | Clause::Delete => return incomplete("the source table is missing"),
            Clause::PendingWhere => {
                return incomplete("the last column predicate has no operator");
            }
            Clause::Insert => return incomplete("the target table is missing"),
            Clause::Update => return incomplete("no column is assigned"),
            _ => {}
        }
        let text = if self.statement == Some(Statement::Insert) {
            if self.columns.is_empty() {
                return incomplete("no value is inserted");
            }
            let mut text = String::with_capacity(self.text.len() + self.columns.len() * 24);
            text.push_str(&self.text);
            text.push_str(" (");
            separated_by(&mut text, &self.columns, |out, v| out.push_str(v), ", ");
            text.push_str(") VALUES (");
            let mut ordinal = 0;
            separated_by(
                &mut text,
                &self.expressions,
                |out, v| match v {
                    Some(expression) => out.push_str(expression),
                    None => {
                        out.push_str(&self.characters.get_parameter_name(ordinal));
                        ordinal += 1;
                    }
                },
                ", ",
            );
            text.push(')');
            text
        } else {
            self.text.clone()
        };
        let query = SqlQuery::with_arguments(text, self.arguments.clone());
        Ok(if self.statement == Some(Statement::Execute) {
            query.into_procedure_call()
        } else {
            query
        })
    }
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `SELECT` on the ANSI dialect, see [`SqlBuilder::select`].
pub fn select<I, S>(columns: I) -> Result<SqlBuilder>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SqlBuilder::new().select(columns)
}

/// `INSERT` on the ANSI dialect, see [`SqlBuilder::insert`].
pub fn insert() -> Result<SqlBuilder> {
    SqlBuilder::new().insert()
}

/// `UPDATE` on the ANSI dialect, see [`SqlBuilder::update`].
pub fn update(table: &str) -> Result<SqlBuilder> {
    SqlBuilder::new().update(table)
}

/// `DELETE` on the ANSI dialect, see [`SqlBuilder::delete`].
pub fn delete() -> Result<SqlBuilder> {
    SqlBuilder::new().delete()
}

/// Stored procedure call on the ANSI dialect, see [`SqlBuilder::execute`].
pub fn execute(procedure: &str) -> Result<SqlBuilder> {
    SqlBuilder::new().execute(procedure)
}
