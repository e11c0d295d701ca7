use crate::util::{is_identifier_char, push_number};
use std::fmt::{self, Display};

/// Escaping and parameter conventions of one SQL dialect.
///
/// Profiles are plain constants, pick the one matching the database:
///
/// ```rust
/// use minnow_core::SqlCharacters;
///
/// let characters = SqlCharacters::MS_SQL;
/// assert_eq!(characters.escape_sql("Sales.Customers"), "[Sales].[Customers]");
/// assert_eq!(characters.get_parameter_name(2), "@p2");
/// assert_eq!(SqlCharacters::EMPTY.get_parameter_name(2), "?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlCharacters {
    pub name: &'static str,
    pub left_delimiter: &'static str,
    pub right_delimiter: &'static str,
    /// Prefix of named parameters.
    pub sql_parameter: &'static str,
    /// Named parameters (`@p0`) when true, positional `?` otherwise.
    pub supports_named_parameters: bool,
    pub like_wildcard: &'static str,
    pub select_wildcard: &'static str,
    pub statement_separator: &'static str,
    /// Empty when the dialect has no stored procedures.
    pub stored_procedure_invocation_command: &'static str,
    /// Expression drawing the next value of a sequence, `{}` stands for its
    /// name. Empty when the dialect has no sequences.
    pub next_sequence_value: &'static str,
}

impl SqlCharacters {
    /// ANSI profile: no delimiters, positional parameters.
    pub const EMPTY: SqlCharacters = SqlCharacters {
        name: "ANSI",
        left_delimiter: "",
        right_delimiter: "",
        sql_parameter: "?",
        supports_named_parameters: false,
        like_wildcard: "%",
        select_wildcard: "*",
        statement_separator: ";",
        stored_procedure_invocation_command: "EXEC",
        next_sequence_value: "NEXT VALUE FOR {}",
    };
    pub const MS_SQL: SqlCharacters = SqlCharacters {
        name: "MsSql",
        left_delimiter: "[",
        right_delimiter: "]",
        sql_parameter: "@",
        supports_named_parameters: true,
        ..Self::EMPTY
    };
    pub const MS_SQL_CE: SqlCharacters = SqlCharacters {
        name: "MsSqlCe",
        stored_procedure_invocation_command: "",
        next_sequence_value: "",
        ..Self::MS_SQL
    };
    pub const MY_SQL: SqlCharacters = SqlCharacters {
        name: "MySql",
        left_delimiter: "`",
        right_delimiter: "`",
        sql_parameter: "@",
        supports_named_parameters: true,
        stored_procedure_invocation_command: "CALL",
        next_sequence_value: "",
        ..Self::EMPTY
    };
    pub const POSTGRE_SQL: SqlCharacters = SqlCharacters {
        name: "PostgreSql",
        left_delimiter: "\"",
        right_delimiter: "\"",
        sql_parameter: ":",
        supports_named_parameters: true,
        stored_procedure_invocation_command: "SELECT",
        next_sequence_value: "nextval('{}')",
        ..Self::EMPTY
    };
    pub const SQLITE: SqlCharacters = SqlCharacters {
        name: "SQLite",
        left_delimiter: "\"",
        right_delimiter: "\"",
        sql_parameter: "@",
        supports_named_parameters: true,
        stored_procedure_invocation_command: "",
        next_sequence_value: "",
        ..Self::EMPTY
    };
    pub const FIREBIRD: SqlCharacters = SqlCharacters {
        name: "Firebird",
        left_delimiter: "\"",
        right_delimiter: "\"",
        sql_parameter: "@",
        supports_named_parameters: true,
        stored_procedure_invocation_command: "EXECUTE PROCEDURE",
        next_sequence_value: "GEN_ID({}, 1)",
        ..Self::EMPTY
    };

    /// Wraps the identifier with the dialect delimiters.
    ///
    /// Dotted names are escaped part by part. Text already escaped, the
    /// select wildcard and expressions (function calls, aliases, anything with
    /// a space) come back unchanged.
    pub fn escape_sql(&self, sql: &str) -> String {
        if sql.is_empty()
            || self.left_delimiter.is_empty()
            || sql == self.select_wildcard
            || self.is_escaped(sql)
            || !Self::is_plain_identifier(sql)
        {
            return sql.to_owned();
        }
        let mut out = String::with_capacity(sql.len() + 8);
        for (i, part) in sql.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            if part == self.select_wildcard || self.is_escaped(part) {
                out.push_str(part);
            } else {
                out.push_str(self.left_delimiter);
                out.push_str(part);
                out.push_str(self.right_delimiter);
            }
        }
        out
    }

    pub fn is_escaped(&self, sql: &str) -> bool {
        !self.left_delimiter.is_empty()
            && sql.len() >= self.left_delimiter.len() + self.right_delimiter.len()
            && sql.starts_with(self.left_delimiter)
            && sql.ends_with(self.right_delimiter)
    }

    /// `?` for positional dialects, `{prefix}p{ordinal}` otherwise.
    pub fn get_parameter_name(&self, ordinal: usize) -> String {
        if !self.supports_named_parameters {
            return "?".into();
        }
        let mut out = String::with_capacity(self.sql_parameter.len() + 4);
        out.push_str(self.sql_parameter);
        out.push('p');
        push_number(&mut out, ordinal);
        out
    }

    /// True when the token is a parameter marker of this dialect.
    pub fn is_sql_parameter(&self, token: &str) -> bool {
        if !self.supports_named_parameters {
            return token == "?";
        }
        token
            .strip_prefix(self.sql_parameter)
            .is_some_and(|name| !name.is_empty() && name.bytes().all(is_identifier_char))
    }

    pub fn supports_stored_procedures(&self) -> bool {
        !self.stored_procedure_invocation_command.is_empty()
    }

    /// The expression drawing the next value of `sequence`, `None` when the
    /// dialect has no sequences.
    pub fn next_value_for(&self, sequence: &str) -> Option<String> {
        (!self.next_sequence_value.is_empty())
            .then(|| self.next_sequence_value.replace("{}", sequence))
    }

    fn is_plain_identifier(sql: &str) -> bool {
        !sql.contains([' ', '(', ')', ',', '\'', '"', '\n', '\t'])
    }
}

impl Default for SqlCharacters {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Display for SqlCharacters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlCharacters;

    #[test]
    fn escape_dotted_names() {
        let c = SqlCharacters::MS_SQL;
        assert_eq!(c.escape_sql("Customers"), "[Customers]");
        assert_eq!(c.escape_sql("Sales.Customers"), "[Sales].[Customers]");
        assert_eq!(c.escape_sql("[Sales].Customers"), "[Sales].[Customers]");
        assert_eq!(c.escape_sql("[Customers]"), "[Customers]");
        assert_eq!(c.escape_sql("*"), "*");
        assert_eq!(c.escape_sql("Customers.*"), "[Customers].*");
        assert_eq!(c.escape_sql("COUNT(Id)"), "COUNT(Id)");
        assert_eq!(c.escape_sql("Name AS Alias"), "Name AS Alias");
        assert_eq!(c.escape_sql("Name COLLATE Latin1_General_CI_AS"), "Name COLLATE Latin1_General_CI_AS");
        assert_eq!(c.escape_sql(""), "");
    }

    #[test]
    fn positional_dialect_never_escapes() {
        let c = SqlCharacters::EMPTY;
        assert_eq!(c.escape_sql("Sales.Customers"), "Sales.Customers");
        assert!(!c.is_escaped("[Customers]"));
    }
}
