use crate::{
    MinnowError, Result, SqlCharacters, SqlQuery,
    sql_utility::{renumber_parameters, verify_arguments},
};
use log::trace;

/// Merges independently built queries into one batch.
///
/// Texts are joined by the dialect statement separator and a newline, the
/// arguments are concatenated in order. The markers of every query after the
/// first are shifted after the arguments of the ones before it, stored
/// procedure calls are passed through as they are. The timeout is the largest
/// of the inputs.
///
/// ```rust
/// use minnow_core::{SqlCharacters, SqlQuery, args, combine};
///
/// let query = combine(
///     [
///         SqlQuery::with_arguments("SELECT * FROM Customers WHERE Id = @p0", args![1]),
///         SqlQuery::with_arguments("SELECT * FROM Invoices WHERE CustomerId = @p0", args![1]),
///     ],
///     &SqlCharacters::MS_SQL,
/// )?;
/// assert_eq!(
///     query.command_text(),
///     "SELECT * FROM Customers WHERE Id = @p0;\nSELECT * FROM Invoices WHERE CustomerId = @p1",
/// );
/// assert_eq!(query.arguments().len(), 2);
/// # Ok::<(), minnow_core::Error>(())
/// ```
pub fn combine(
    queries: impl IntoIterator<Item = SqlQuery>,
    characters: &SqlCharacters,
) -> Result<SqlQuery> {
    let queries: Vec<SqlQuery> = queries.into_iter().collect();
    if queries.len() < 2 {
        return Err(MinnowError::argument(format!(
            "Combining needs at least two queries, {} supplied",
            queries.len()
        ))
        .into());
    }
    let count = queries.len();
    let separator = characters.statement_separator;
    let mut text = String::with_capacity(
        queries
            .iter()
            .map(|v| v.command_text().len() + separator.len() + 1)
            .sum(),
    );
    let mut arguments = Vec::with_capacity(queries.iter().map(|v| v.arguments().len()).sum());
    let mut timeout = 0;
    for (i, query) in queries.into_iter().enumerate() {
        verify_arguments(
            query.command_text(),
            query.arguments().len(),
            format_args!("Query {i} `{query}`"),
        )?;
        timeout = timeout.max(query.timeout());
        let is_procedure = query.is_stored_procedure_call(characters);
        let (command, query_arguments) = query.into_parts();
        arguments.extend(query_arguments);
        let command = if i == 0 || is_procedure {
            command
        } else {
            renumber_parameters(&command, arguments.len())
        };
        if i > 0 {
            text.push_str(separator);
            text.push('\n');
        }
        text.push_str(command.trim_end().trim_end_matches(separator).trim_end());
    }
    trace!(
        "Combined {count} queries with {} arguments: {}",
        arguments.len(),
        crate::truncate_long!(&text)
    );
    let mut query = SqlQuery::with_arguments(text, arguments);
    query.set_timeout(timeout);
    Ok(query)
}

/// [`combine`] with [`SqlCharacters::EMPTY`].
pub fn combine_default(queries: impl IntoIterator<Item = SqlQuery>) -> Result<SqlQuery> {
    combine(queries, &SqlCharacters::EMPTY)
}
