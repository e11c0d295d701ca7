//! Parameter markers in raw SQL text.
//!
//! Three marker conventions are recognized because drivers differ: `@name`,
//! `:name` and the positional `?`. Markers inside string literals, quoted
//! identifiers and comments are ignored, as are PostgreSQL casts (`::int`)
//! and SQL Server system variables (`@@IDENTITY`).

use crate::{
    MinnowError, Result,
    util::{is_identifier_char, is_identifier_start, push_number},
};
use log::trace;
use std::fmt::Display;

/// One parameter marker found in a SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterToken<'s> {
    /// Byte offset of the marker.
    pub position: usize,
    /// The marker including its prefix: `@p0`, `:name` or `?`.
    pub text: &'s str,
}

impl<'s> ParameterToken<'s> {
    pub fn is_positional(&self) -> bool {
        self.text == "?"
    }

    pub fn prefix(&self) -> &'s str {
        &self.text[..1]
    }

    pub fn name(&self) -> &'s str {
        &self.text[1..]
    }

    /// `N` when the marker is shaped like `@pN`.
    pub fn ordinal(&self) -> Option<usize> {
        let digits = self.name().strip_prefix('p')?;
        if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    SingleQuoted,
    Delimited(u8),
    LineComment,
    BlockComment(u32),
}

/// Iterator over the parameter markers of a SQL text, in order of appearance.
#[derive(Debug, Clone)]
pub struct ParameterScanner<'s> {
    sql: &'s str,
    position: usize,
    state: State,
}

impl<'s> ParameterScanner<'s> {
    pub fn new(sql: &'s str) -> Self {
        Self {
            sql,
            position: 0,
            state: State::Normal,
        }
    }

    fn token(&self, start: usize, end: usize) -> ParameterToken<'s> {
        ParameterToken {
            position: start,
            text: &self.sql[start..end],
        }
    }
}

fn scan_identifier(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && is_identifier_char(bytes[idx]) {
        idx += 1;
    }
    idx
}

impl<'s> Iterator for ParameterScanner<'s> {
    type Item = ParameterToken<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.sql.as_bytes();
        while self.position < bytes.len() {
            let i = self.position;
            let c = bytes[i];
            let next = bytes.get(i + 1).copied();
            match self.state {
                State::Normal => match c {
                    b'\'' => {
                        self.state = State::SingleQuoted;
                        self.position += 1;
                    }
                    b'"' => {
                        self.state = State::Delimited(b'"');
                        self.position += 1;
                    }
                    b'`' => {
                        self.state = State::Delimited(b'`');
                        self.position += 1;
                    }
                    b'[' => {
                        self.state = State::Delimited(b']');
                        self.position += 1;
                    }
                    b'-' if next == Some(b'-') => {
                        self.state = State::LineComment;
                        self.position += 2;
                    }
                    b'/' if next == Some(b'*') => {
                        self.state = State::BlockComment(1);
                        self.position += 2;
                    }
                    b'?' => {
                        self.position += 1;
                        return Some(self.token(i, i + 1));
                    }
                    b':' if next == Some(b':') => {
                        self.position = scan_identifier(bytes, i + 2);
                    }
                    b'@' if next == Some(b'@') => {
                        self.position = scan_identifier(bytes, i + 2);
                    }
                    b'@' | b':' if next.is_some_and(is_identifier_start) => {
                        let end = scan_identifier(bytes, i + 1);
                        self.position = end;
                        return Some(self.token(i, end));
                    }
                    _ => self.position += 1,
                },
                State::SingleQuoted => {
                    // A doubled quote closes and reopens the literal.
                    if c == b'\'' {
                        self.state = State::Normal;
                    }
                    self.position += 1;
                }
                State::Delimited(closing) => {
                    if c == closing {
                        self.state = State::Normal;
                    }
                    self.position += 1;
                }
                State::LineComment => {
                    if c == b'\n' {
                        self.state = State::Normal;
                    }
                    self.position += 1;
                }
                State::BlockComment(depth) => {
                    if c == b'*' && next == Some(b'/') {
                        self.state = if depth > 1 {
                            State::BlockComment(depth - 1)
                        } else {
                            State::Normal
                        };
                        self.position += 2;
                    } else if c == b'/' && next == Some(b'*') {
                        self.state = State::BlockComment(depth + 1);
                        self.position += 2;
                    } else {
                        self.position += 1;
                    }
                }
            }
        }
        None
    }
}

pub fn parameter_tokens(sql: &str) -> ParameterScanner<'_> {
    ParameterScanner::new(sql)
}

/// Byte index of the first parameter marker, `None` when the text has none.
pub fn get_first_parameter_position(sql: &str) -> Option<usize> {
    parameter_tokens(sql).next().map(|v| v.position)
}

/// Distinct named markers in order of first appearance.
///
/// A marker referenced twice contributes one name. Positional `?` markers
/// have no name and are not listed.
pub fn get_parameter_names(sql: &str) -> Vec<String> {
    distinct_names(sql).into_iter().map(Into::into).collect()
}

fn distinct_names(sql: &str) -> Vec<&str> {
    let mut names = Vec::new();
    for token in parameter_tokens(sql).filter(|v| !v.is_positional()) {
        if !names.contains(&token.text) {
            names.push(token.text);
        }
    }
    names
}

/// Number of arguments the text expects: one per distinct named marker plus
/// one per positional marker.
pub fn count_parameters(sql: &str) -> usize {
    let mut positional = 0;
    let mut names = Vec::new();
    for token in parameter_tokens(sql) {
        if token.is_positional() {
            positional += 1;
        } else if !names.contains(&token.text) {
            names.push(token.text);
        }
    }
    positional + names.len()
}

/// True when the text uses both positional `?` and named markers.
pub fn has_mixed_parameters(sql: &str) -> bool {
    let (mut positional, mut named) = (false, false);
    for token in parameter_tokens(sql) {
        if token.is_positional() {
            positional = true;
        } else {
            named = true;
        }
        if positional && named {
            return true;
        }
    }
    false
}

/// Checks that `sql` can be renumbered and expects exactly `supplied`
/// arguments. `what` names the text in the error.
pub(crate) fn verify_arguments(sql: &str, supplied: usize, what: impl Display) -> Result<()> {
    if has_mixed_parameters(sql) {
        return Err(MinnowError::shape_mismatch(format!(
            "{what} mixes positional and named parameters"
        ))
        .into());
    }
    let expected = count_parameters(sql);
    if expected != supplied {
        return Err(MinnowError::shape_mismatch(format!(
            "{what} expects {expected} arguments but {supplied} were supplied"
        ))
        .into());
    }
    Ok(())
}

/// Rewrites every `@pN` marker so the text fits after the arguments already
/// collected.
///
/// `total_argument_count` is the number of arguments once this text's own are
/// appended, the markers are therefore shifted by `total_argument_count -
/// distinct markers`. The distinct `pN` markers keep their relative order and
/// repeated markers keep sharing one argument. The text is rewritten in a
/// single pass, `@p1` is never confused with `@p10`.
///
/// ```rust
/// use minnow_core::sql_utility::renumber_parameters;
///
/// assert_eq!(
///     renumber_parameters("Column = @p0 OR @p0 IS NULL", 3),
///     "Column = @p2 OR @p2 IS NULL",
/// );
/// ```
pub fn renumber_parameters(sql: &str, total_argument_count: usize) -> String {
    let tokens: Vec<_> = parameter_tokens(sql)
        .filter(|v| !v.is_positional())
        .collect();
    if tokens.is_empty() {
        return sql.to_owned();
    }
    let distinct = distinct_names(sql).len();
    let mut ordinals: Vec<usize> = tokens.iter().filter_map(ParameterToken::ordinal).collect();
    ordinals.sort_unstable();
    ordinals.dedup();
    let offset = total_argument_count.saturating_sub(distinct);
    let mut result = String::with_capacity(sql.len() + tokens.len() * 2);
    let mut last = 0;
    for token in &tokens {
        let Some(ordinal) = token.ordinal() else {
            continue;
        };
        let rank = ordinals.binary_search(&ordinal).unwrap_or_else(|i| i);
        result.push_str(&sql[last..token.position]);
        result.push_str(token.prefix());
        result.push('p');
        push_number(&mut result, offset + rank);
        last = token.position + token.text.len();
    }
    result.push_str(&sql[last..]);
    trace!(
        "Renumbered {} parameters by {offset}: {}",
        ordinals.len(),
        crate::truncate_long!(&result)
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_states() {
        let sql = "SELECT '@p9', \"@p8\", [@p7] -- @p6\n/* @p5 /* @p4 */ @p3 */ FROM T WHERE A = @p0";
        let tokens: Vec<_> = parameter_tokens(sql).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "@p0");
        assert_eq!(tokens[0].position, sql.len() - 3);
    }

    #[test]
    fn ordinals() {
        let token = |text| ParameterToken { position: 0, text };
        assert_eq!(token("@p12").ordinal(), Some(12));
        assert_eq!(token(":p0").ordinal(), Some(0));
        assert_eq!(token("@param").ordinal(), None);
        assert_eq!(token("@p").ordinal(), None);
        assert_eq!(token("?").ordinal(), None);
    }
}
