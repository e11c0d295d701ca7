use crate::{Error, Result};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// How the value of the identifier column is produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierStrategy {
    /// Set by the caller, never generated.
    Assigned,
    /// Returned by the database after the insert.
    #[default]
    DbGenerated,
    /// Drawn from a named database sequence before the insert.
    Sequence,
}

impl IdentifierStrategy {
    pub const IDENTITY: IdentifierStrategy = IdentifierStrategy::DbGenerated;
}

impl FromStr for IdentifierStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            x if x.eq_ignore_ascii_case("assigned") => Ok(Self::Assigned),
            x if x.eq_ignore_ascii_case("db_generated")
                || x.eq_ignore_ascii_case("dbgenerated")
                || x.eq_ignore_ascii_case("identity") =>
            {
                Ok(Self::DbGenerated)
            }
            x if x.eq_ignore_ascii_case("sequence") => Ok(Self::Sequence),
            _ => Err(Error::msg(format!(
                "Unknown identifier strategy `{s}`, expected one of: assigned, db_generated, identity, sequence"
            ))),
        }
    }
}

impl Display for IdentifierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assigned => "Assigned",
            Self::DbGenerated => "DbGenerated",
            Self::Sequence => "Sequence",
        })
    }
}
