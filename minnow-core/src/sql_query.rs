use crate::{SqlArgument, SqlCharacters, truncate_long};
use std::fmt::{self, Display};

/// A finished statement: command text, ordered arguments and a timeout.
///
/// Two queries are equal when text and arguments are equal, the timeout is
/// not compared.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    command_text: String,
    arguments: Vec<SqlArgument>,
    timeout: u32,
    /// Built by [`crate::SqlBuilder::execute`].
    procedure_call: bool,
}

impl SqlQuery {
    /// Seconds.
    pub const DEFAULT_TIMEOUT: u32 = 30;

    pub fn new(command_text: impl Into<String>) -> Self {
        Self::with_arguments(command_text, Vec::new())
    }

    pub fn with_arguments(command_text: impl Into<String>, arguments: Vec<SqlArgument>) -> Self {
        Self {
            command_text: command_text.into(),
            arguments,
            timeout: Self::DEFAULT_TIMEOUT,
            procedure_call: false,
        }
    }

    pub(crate) fn into_procedure_call(mut self) -> Self {
        self.procedure_call = true;
        self
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn arguments(&self) -> &[SqlArgument] {
        &self.arguments
    }

    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: u32) {
        self.timeout = timeout;
    }

    pub fn into_parts(self) -> (String, Vec<SqlArgument>) {
        (self.command_text, self.arguments)
    }

    /// True when the query invokes a single stored procedure of the dialect.
    ///
    /// Queries from [`crate::SqlBuilder::execute`] always are. Raw text must
    /// start with the invocation command; when that command is `SELECT` the
    /// text must also read `SELECT name(..)` with no `FROM`, otherwise it is
    /// an ordinary query.
    pub fn is_stored_procedure_call(&self, characters: &SqlCharacters) -> bool {
        if self.procedure_call {
            return true;
        }
        let command = characters.stored_procedure_invocation_command;
        if command.is_empty()
            || !self
                .command_text
                .get(..command.len())
                .is_some_and(|v| v.eq_ignore_ascii_case(command))
        {
            return false;
        }
        let rest = &self.command_text[command.len()..];
        if !rest.starts_with(char::is_whitespace)
            || self
                .command_text
                .trim_end()
                .trim_end_matches(characters.statement_separator)
                .contains(characters.statement_separator)
        {
            return false;
        }
        if !command.eq_ignore_ascii_case("SELECT") {
            return true;
        }
        let rest = rest.trim_start();
        let name = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '"')))
            .unwrap_or(rest.len());
        name > 0
            && rest[name..].trim_start().starts_with('(')
            && !rest
                .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .any(|v| v.eq_ignore_ascii_case("FROM"))
    }
}

impl PartialEq for SqlQuery {
    fn eq(&self, other: &Self) -> bool {
        self.command_text == other.command_text && self.arguments == other.arguments
    }
}

impl Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(&self.command_text))
    }
}

impl From<&str> for SqlQuery {
    fn from(value: &str) -> Self {
        SqlQuery::new(value)
    }
}

impl From<String> for SqlQuery {
    fn from(value: String) -> Self {
        SqlQuery::new(value)
    }
}
