use super::{Clause, SqlBuilder, Statement};
use crate::{Mapped, MinnowError, Result, SqlArgument};

impl SqlBuilder {
    /// Starts an `INSERT`, the target follows with [`Self::into`].
    pub fn insert(mut self) -> Result<Self> {
        self.begin("insert", Statement::Insert, Clause::Insert)?;
        Ok(self)
    }

    pub fn into(mut self, table: &str) -> Result<Self> {
        self.expect("into", &[Clause::Insert])?;
        let table = self.escape(table);
        self.text.push_str("INSERT INTO ");
        self.text.push_str(&table);
        self.clause = Clause::Into;
        Ok(self)
    }

    pub fn into_type<T: Mapped>(self) -> Result<Self> {
        self.expect("into_type", &[Clause::Insert])?;
        let table = self.registry().get::<T>()?.table_info().qualified_name();
        self.into(&table)
    }

    /// Adds a column and its value to the `INSERT`.
    pub fn value(mut self, column: &str, value: impl Into<SqlArgument>) -> Result<Self> {
        self.expect("value", &[Clause::Into])?;
        let column = self.escape(column);
        self.columns.push(column);
        self.expressions.push(None);
        self.arguments.push(value.into());
        Ok(self)
    }

    /// Adds a column filled with the next value of `sequence`.
    ///
    /// Fails with [`MinnowError::Unsupported`] on dialects without sequences.
    pub fn value_from_sequence(mut self, column: &str, sequence: &str) -> Result<Self> {
        self.expect("value_from_sequence", &[Clause::Into])?;
        if sequence.trim().is_empty() {
            return Err(MinnowError::argument("The sequence name cannot be empty").into());
        }
        let Some(expression) = self.characters.next_value_for(sequence) else {
            return Err(MinnowError::unsupported(format!(
                "{} does not support sequences",
                self.characters
            ))
            .into());
        };
        let column = self.escape(column);
        self.columns.push(column);
        self.expressions.push(Some(expression));
        Ok(self)
    }

    /// Starts an `UPDATE` of `table`, assignments follow with
    /// [`Self::set_column_value`].
    pub fn update(mut self, table: &str) -> Result<Self> {
        self.begin("update", Statement::Update, Clause::Update)?;
        let table = self.escape(table);
        self.text.push_str("UPDATE ");
        self.text.push_str(&table);
        self.text.push_str(" SET ");
        Ok(self)
    }

    pub fn update_type<T: Mapped>(self) -> Result<Self> {
        self.expect("update_type", &[Clause::Start])?;
        let table = self.registry().get::<T>()?.table_info().qualified_name();
        self.update(&table)
    }

    pub fn set_column_value(mut self, column: &str, value: impl Into<SqlArgument>) -> Result<Self> {
        self.expect("set_column_value", &[Clause::Update, Clause::Set])?;
        if self.clause == Clause::Set {
            self.text.push_str(", ");
        }
        let column = self.escape(column);
        self.text.push_str(&column);
        self.text.push_str(" = ");
        self.push_argument(value);
        self.clause = Clause::Set;
        Ok(self)
    }

    /// `WHERE column = value` of an `UPDATE` or a `DELETE`.
    pub fn where_equals(mut self, column: &str, value: impl Into<SqlArgument>) -> Result<Self> {
        self.expect("where_equals", &[Clause::From, Clause::Set])?;
        if self.statement == Some(Statement::Select) {
            return Err(MinnowError::invalid_operation(
                "`where_equals` applies to updates and deletes, use `where_column` in a select",
            )
            .into());
        }
        let column = self.escape(column);
        self.text.push_str(" WHERE ");
        self.text.push_str(&column);
        self.text.push_str(" = ");
        self.push_argument(value);
        self.clause = Clause::Where;
        Ok(self)
    }

    /// Starts a `DELETE`, the source follows with [`Self::from`].
    pub fn delete(mut self) -> Result<Self> {
        self.begin("delete", Statement::Delete, Clause::Delete)?;
        Ok(self)
    }

    /// Invokes a stored procedure using the dialect invocation command.
    ///
    /// Fails with [`MinnowError::Unsupported`] on dialects without stored
    /// procedures.
    pub fn execute(mut self, procedure: &str) -> Result<Self> {
        if !self.characters.supports_stored_procedures() {
            return Err(MinnowError::unsupported(format!(
                "{} does not support stored procedures",
                self.characters
            ))
            .into());
        }
        if procedure.trim().is_empty() {
            return Err(MinnowError::argument("The procedure name cannot be empty").into());
        }
        self.begin("execute", Statement::Execute, Clause::Execute)?;
        self.text
            .push_str(self.characters.stored_procedure_invocation_command);
        self.text.push(' ');
        self.text.push_str(procedure);
        Ok(self)
    }

    /// Passes a named procedure parameter, the name is written verbatim.
    pub fn with_parameter(mut self, name: &str, value: impl Into<SqlArgument>) -> Result<Self> {
        self.expect("with_parameter", &[Clause::Execute])?;
        self.text
            .push_str(if self.arguments.is_empty() { " " } else { ", " });
        self.text.push_str(name);
        self.arguments.push(value.into());
        Ok(self)
    }
}
