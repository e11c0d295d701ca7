use crate::{ColumnInfo, IdentifierStrategy, MinnowError, Result};

/// The table a type maps to.
///
/// Construction validates the columns: names are unique (ignoring ASCII
/// case), exactly one column is the identifier and at most one is the
/// version column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    name: String,
    schema: Option<String>,
    columns: Vec<ColumnInfo>,
    identifier_index: usize,
    identifier_strategy: IdentifierStrategy,
    version_index: Option<usize>,
}

impl TableInfo {
    pub fn new(
        name: impl Into<String>,
        schema: Option<String>,
        columns: Vec<ColumnInfo>,
        identifier_strategy: IdentifierStrategy,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MinnowError::configuration("The table name cannot be empty").into());
        }
        if columns.is_empty() {
            return Err(MinnowError::configuration(format!(
                "Table `{name}` does not map any column"
            ))
            .into());
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i]
                .iter()
                .any(|v| v.column_name.eq_ignore_ascii_case(&column.column_name))
            {
                return Err(MinnowError::configuration(format!(
                    "Table `{name}` maps column `{}` more than once",
                    column.column_name
                ))
                .into());
            }
        }
        let identifiers: Vec<_> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_identifier)
            .map(|(i, _)| i)
            .collect();
        let identifier_index = match identifiers.as_slice() {
            [i] => *i,
            [] => {
                return Err(MinnowError::configuration(format!(
                    "Table `{name}` has no identifier column"
                ))
                .into());
            }
            _ => {
                return Err(MinnowError::configuration(format!(
                    "Table `{name}` has {} identifier columns, exactly one is required",
                    identifiers.len()
                ))
                .into());
            }
        };
        if identifier_strategy == IdentifierStrategy::Sequence
            && columns[identifier_index]
                .sequence_name
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(MinnowError::configuration(format!(
                "Table `{name}` uses a sequence identifier but no sequence name"
            ))
            .into());
        }
        let mut versions = columns.iter().enumerate().filter(|(_, c)| c.is_version);
        let version_index = versions.next().map(|(i, _)| i);
        if versions.next().is_some() {
            return Err(MinnowError::configuration(format!(
                "Table `{name}` has more than one version column"
            ))
            .into());
        }
        Ok(Self {
            name,
            schema: schema.filter(|v| !v.is_empty()),
            columns,
            identifier_index,
            identifier_strategy,
            version_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// `schema.name` or just `name`.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn column(&self, column_name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|v| v.column_name.eq_ignore_ascii_case(column_name))
    }

    pub fn identifier_column(&self) -> &ColumnInfo {
        &self.columns[self.identifier_index]
    }

    pub(crate) fn identifier_index(&self) -> usize {
        self.identifier_index
    }

    pub fn identifier_strategy(&self) -> IdentifierStrategy {
        self.identifier_strategy
    }

    pub fn version_column(&self) -> Option<&ColumnInfo> {
        self.version_index.map(|i| &self.columns[i])
    }

    /// Columns written by an insert, in table order. The identifier takes
    /// part only when assigned by the caller.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| self.is_insert_column(c))
    }

    /// Columns written by an update, in table order, never the identifier.
    pub fn update_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| Self::is_update_column(c))
    }

    pub(crate) fn is_insert_column(&self, column: &ColumnInfo) -> bool {
        column.allow_insert
            && (!column.is_identifier || self.identifier_strategy == IdentifierStrategy::Assigned)
    }

    pub(crate) fn is_update_column(column: &ColumnInfo) -> bool {
        column.allow_update && !column.is_identifier
    }
}
