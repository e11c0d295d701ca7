use super::SqlBuilder;
use crate::{IdentifierStrategy, Mapped, MinnowError, Result, SqlArgument, SqlQuery};

/// Statements for single instances of mapped types.
///
/// These use the dialect and the registry of the builder, its own statement
/// is left untouched.
impl SqlBuilder {
    fn fresh(&self) -> Self {
        let mut builder = SqlBuilder::with_characters(self.characters);
        builder.registry = self.registry.clone();
        builder
    }

    /// `INSERT` of the insertable columns.
    ///
    /// The identifier is verified against the identifier strategy first. A
    /// sequence identifier is filled with the next value of its sequence.
    pub fn insert_query<T: Mapped>(&self, instance: &T) -> Result<SqlQuery> {
        let info = self.registry().get::<T>()?;
        info.verify_instance_for_insert(instance)?;
        let table_info = info.table_info();
        let sequence = table_info.identifier_strategy() == IdentifierStrategy::Sequence;
        let mut builder = self.fresh().insert()?.into(&table_info.qualified_name())?;
        let mut values = info.get_insert_values(instance).into_iter();
        for column in table_info.columns() {
            if column.is_identifier && sequence {
                if let Some(name) = &column.sequence_name {
                    builder = builder.value_from_sequence(&column.column_name, name)?;
                }
            } else if table_info.is_insert_column(column) {
                let Some(argument) = values.next() else {
                    break;
                };
                builder = builder.value(&column.column_name, argument)?;
            }
        }
        builder.to_sql_query()
    }

    /// `UPDATE` of the updatable columns, matched on the identifier.
    pub fn update_query<T: Mapped>(&self, instance: &T) -> Result<SqlQuery> {
        let info = self.registry().get::<T>()?;
        let table_info = info.table_info();
        let mut values = info.get_update_values(instance);
        let Some(identifier) = values.pop().filter(|_| !values.is_empty()) else {
            return Err(MinnowError::invalid_operation(format!(
                "`{}` has no updatable column",
                info.type_name()
            ))
            .into());
        };
        let mut builder = self.fresh().update(&table_info.qualified_name())?;
        for (column, argument) in table_info.update_columns().zip(values) {
            builder = builder.set_column_value(&column.column_name, argument)?;
        }
        builder
            .where_equals(&table_info.identifier_column().column_name, identifier)?
            .to_sql_query()
    }

    /// `DELETE` matched on the identifier.
    pub fn delete_query<T: Mapped>(&self, instance: &T) -> Result<SqlQuery> {
        let info = self.registry().get::<T>()?;
        let table_info = info.table_info();
        let identifier = table_info.identifier_column();
        self.fresh()
            .delete()?
            .from(&table_info.qualified_name())?
            .where_equals(
                &identifier.column_name,
                SqlArgument::with_db_type(info.get_identifier_value(instance), identifier.db_type),
            )?
            .to_sql_query()
    }

    /// `SELECT` of every mapped column of the row with the given identifier.
    pub fn select_by_identifier<T: Mapped>(
        &self,
        identifier: impl Into<SqlArgument>,
    ) -> Result<SqlQuery> {
        let info = self.registry().get::<T>()?;
        let column = &info.table_info().identifier_column().column_name;
        self.fresh()
            .select([self.characters.select_wildcard])?
            .from_type::<T>()?
            .where_column(column)?
            .is_equal_to(identifier)?
            .to_sql_query()
    }
}
