use crate::DbType;

/// One mapped column and the property it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub column_name: String,
    /// Name of the struct field holding the column value.
    pub property_name: String,
    pub db_type: DbType,
    pub is_identifier: bool,
    pub allow_insert: bool,
    pub allow_update: bool,
    pub sequence_name: Option<String>,
    pub is_version: bool,
}

impl ColumnInfo {
    pub fn new(
        column_name: impl Into<String>,
        property_name: impl Into<String>,
        db_type: DbType,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            property_name: property_name.into(),
            db_type,
            is_identifier: false,
            allow_insert: true,
            allow_update: true,
            sequence_name: None,
            is_version: false,
        }
    }

    pub fn identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }

    pub fn sequence(mut self, name: impl Into<String>) -> Self {
        self.sequence_name = Some(name.into());
        self
    }

    pub fn insertable(mut self, allow: bool) -> Self {
        self.allow_insert = allow;
        self
    }

    pub fn updatable(mut self, allow: bool) -> Self {
        self.allow_update = allow;
        self
    }

    pub fn version(mut self) -> Self {
        self.is_version = true;
        self
    }
}
