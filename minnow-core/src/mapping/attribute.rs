use crate::{
    ColumnInfo, DbType, IdentifierStrategy, MappingConvention, MinnowError, Result, TableInfo,
    TypeDescriptor, mapping::check_constructor,
};

/// Maps only what the type declares explicitly.
///
/// The type needs a table marker (`#[minnow(table = "..")]`) and only the
/// properties carrying a column marker become columns. The identifier
/// strategy comes from the identifier marker and defaults to
/// [`IdentifierStrategy::DbGenerated`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeMappingConvention;

impl MappingConvention for AttributeMappingConvention {
    fn create_table_info(&self, descriptor: &TypeDescriptor) -> Result<TableInfo> {
        check_constructor(descriptor)?;
        let Some(table) = &descriptor.table else {
            return Err(MinnowError::configuration(format!(
                "Type `{}` has no table attribute, use it like `#[minnow(table = \"Customers\")]`",
                descriptor.type_name
            ))
            .into());
        };
        let mut identifier_strategy = IdentifierStrategy::default();
        let columns = descriptor
            .properties
            .iter()
            .filter_map(|p| p.column.as_ref().map(|c| (p, c)))
            .map(|(property, column)| {
                let mut info = ColumnInfo::new(
                    column.name.as_deref().unwrap_or(property.name),
                    property.name,
                    column.db_type.unwrap_or_else(|| DbType::from(&property.value)),
                );
                info.allow_insert = column.allow_insert;
                info.allow_update = column.allow_update;
                info.is_version = column.version;
                if let Some(strategy) = column.identifier {
                    identifier_strategy = strategy;
                    info.is_identifier = true;
                    info.sequence_name = column.sequence.clone();
                }
                info
            })
            .collect();
        TableInfo::new(
            table.name.clone(),
            table.schema.clone(),
            columns,
            identifier_strategy,
        )
    }
}
