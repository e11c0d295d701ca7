use std::{
    cmp::min,
    fmt::{self, Display},
};

/// Writes the items using `f`, putting `separator` between the ones that
/// produced some output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Appends a decimal number without going through the formatting machinery.
pub fn push_number(out: &mut String, value: usize) {
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(value));
}

pub(crate) fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub(crate) fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Displays a possibly long SQL text for messages and logs, cut at 497 bytes.
pub struct Truncated<'a>(pub &'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut end = min(self.0.len(), 497);
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(
            f,
            "{}{}",
            self.0[..end].trim_end(),
            if self.0.len() > end { "..." } else { "" }
        )
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::Truncated($query)
    };
}
