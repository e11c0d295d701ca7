mod dynamic;
mod registry;

pub use dynamic::*;
pub use registry::*;

use crate::{
    ColumnInfo, Context, Error, IdentifierStrategy, Mapped, MappingConvention, MinnowError, PropertyAccessor,
    Result, RowCursor, SqlArgument, TableInfo, TypeDefinition, Value,
};
use std::{any::Any, collections::HashMap};

/// Metadata and bindings of one mapped type.
///
/// Built once per type by an [`ObjectInfoRegistry`]: the table metadata comes
/// from the mapping convention, the accessors of every column are resolved
/// here so moving values between instances and rows never looks anything up
/// by property name again.
pub struct ObjectInfo<T> {
    type_name: &'static str,
    table_info: TableInfo,
    /// Aligned with `table_info.columns()`.
    bindings: Box<[PropertyAccessor<T>]>,
    /// Lowercase column name to column index.
    column_map: HashMap<String, usize>,
    constructor: fn() -> T,
    default_identifier: Value,
}

impl<T: Mapped> ObjectInfo<T> {
    pub fn new(convention: &dyn MappingConvention) -> Result<Self> {
        Self::from_definition(T::type_definition(), convention)
    }

    pub fn from_definition(
        definition: TypeDefinition<T>,
        convention: &dyn MappingConvention,
    ) -> Result<Self> {
        let descriptor = definition.descriptor();
        let table_info = convention.create_table_info(descriptor)?;
        let Some(constructor) = definition.constructor() else {
            return Err(MinnowError::configuration(format!(
                "Type `{}` has no parameterless constructor, derive or implement `Default`",
                descriptor.type_name
            ))
            .into());
        };
        let bindings = table_info
            .columns()
            .iter()
            .map(|column| {
                definition.accessor(&column.property_name).ok_or_else(|| {
                    Error::new(MinnowError::configuration(format!(
                        "Column `{}` is bound to `{}` which is not a property of `{}`",
                        column.column_name, column.property_name, descriptor.type_name
                    )))
                })
            })
            .collect::<Result<Box<[_]>>>()?;
        let column_map = table_info
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.column_name.to_ascii_lowercase(), i))
            .collect();
        let default_identifier = (bindings[table_info.identifier_index()].get)(&constructor());
        Ok(Self {
            type_name: descriptor.type_name,
            table_info,
            bindings,
            column_map,
            constructor,
            default_identifier,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table_info(&self) -> &TableInfo {
        &self.table_info
    }

    /// Builds a new instance out of the current row.
    ///
    /// Columns the type does not map are skipped, null columns leave the
    /// property at its default value.
    pub fn create_instance(&self, cursor: &dyn RowCursor) -> Result<T> {
        let mut instance = (self.constructor)();
        for i in 0..cursor.field_count() {
            let name = cursor.name(i);
            let Some(&index) = self.column_map.get(&name.to_ascii_lowercase()) else {
                continue;
            };
            if cursor.is_null(i) {
                continue;
            }
            let result = cursor
                .value(i)
                .and_then(|value| (self.bindings[index].set)(&mut instance, value));
            if let Err(error) = result {
                return Err(MinnowError::data(name, format!("{error:#}")).into());
            }
        }
        Ok(instance)
    }

    pub fn get_identifier_value(&self, instance: &T) -> Value {
        (self.bindings[self.table_info.identifier_index()].get)(instance)
    }

    /// One argument per insertable column, in table order.
    pub fn get_insert_values(&self, instance: &T) -> Vec<SqlArgument> {
        self.arguments(instance, |c| self.table_info.is_insert_column(c))
    }

    /// One argument per updatable column in table order, then the identifier.
    pub fn get_update_values(&self, instance: &T) -> Vec<SqlArgument> {
        let mut arguments = self.arguments(instance, TableInfo::is_update_column);
        let identifier = self.table_info.identifier_column();
        arguments.push(SqlArgument::with_db_type(
            self.get_identifier_value(instance),
            identifier.db_type,
        ));
        arguments
    }

    fn arguments(
        &self,
        instance: &T,
        filter: impl Fn(&ColumnInfo) -> bool,
    ) -> Vec<SqlArgument> {
        self.table_info
            .columns()
            .iter()
            .zip(&self.bindings)
            .filter(|(column, _)| filter(*column))
            .map(|(column, binding)| SqlArgument::with_db_type((binding.get)(instance), column.db_type))
            .collect()
    }

    pub fn set_identifier_value(&self, instance: &mut T, value: impl Into<Value>) -> Result<()> {
        (self.bindings[self.table_info.identifier_index()].set)(instance, value.into())
            .with_context(|| format!("Cannot set the identifier of `{}`", self.type_name))
    }

    /// The identifier still holds the value of a default constructed instance.
    pub fn has_default_identifier_value(&self, instance: &T) -> bool {
        self.get_identifier_value(instance) == self.default_identifier
    }

    /// Checks the identifier against the identifier strategy before an insert.
    ///
    /// An assigned identifier must be set, a generated one must not.
    pub fn verify_instance_for_insert(&self, instance: &T) -> Result<()> {
        let is_default = self.has_default_identifier_value(instance);
        match self.table_info.identifier_strategy() {
            IdentifierStrategy::Assigned if is_default => Err(MinnowError::identifier(format!(
                "The identifier of `{}` is assigned and must be set before inserting",
                self.type_name
            ))
            .into()),
            IdentifierStrategy::DbGenerated | IdentifierStrategy::Sequence if !is_default => {
                Err(MinnowError::identifier(format!(
                    "The identifier of `{}` is generated by the database and must not be set before inserting",
                    self.type_name
                ))
                .into())
            }
            _ => Ok(()),
        }
    }
}

/// Object info with the instance type erased.
///
/// Lets code handle any mapped type, or rows with no type at all
/// ([`DynamicObjectInfo`]), through one interface. Passing an instance of
/// another type is a [`MinnowError::ShapeMismatch`].
pub trait AnyObjectInfo: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn table_info(&self) -> Result<&TableInfo>;
    fn create_instance(&self, cursor: &dyn RowCursor) -> Result<Box<dyn Any + Send>>;
    fn get_identifier_value(&self, instance: &dyn Any) -> Result<Value>;
    fn get_insert_values(&self, instance: &dyn Any) -> Result<Vec<SqlArgument>>;
    fn get_update_values(&self, instance: &dyn Any) -> Result<Vec<SqlArgument>>;
    fn set_identifier_value(&self, instance: &mut dyn Any, value: Value) -> Result<()>;
    fn has_default_identifier_value(&self, instance: &dyn Any) -> Result<bool>;
    fn verify_instance_for_insert(&self, instance: &dyn Any) -> Result<()>;
}

impl<T: Mapped> ObjectInfo<T> {
    fn shape_mismatch(&self) -> Error {
        MinnowError::shape_mismatch(format!(
            "The instance is not a `{}`, cannot use its object info",
            self.type_name
        ))
        .into()
    }

    fn downcast<'a>(&self, instance: &'a dyn Any) -> Result<&'a T> {
        instance
            .downcast_ref::<T>()
            .ok_or_else(|| self.shape_mismatch())
    }
}

impl<T: Mapped> AnyObjectInfo for ObjectInfo<T> {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn table_info(&self) -> Result<&TableInfo> {
        Ok(&self.table_info)
    }

    fn create_instance(&self, cursor: &dyn RowCursor) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(ObjectInfo::create_instance(self, cursor)?))
    }

    fn get_identifier_value(&self, instance: &dyn Any) -> Result<Value> {
        Ok(ObjectInfo::get_identifier_value(self, self.downcast(instance)?))
    }

    fn get_insert_values(&self, instance: &dyn Any) -> Result<Vec<SqlArgument>> {
        Ok(ObjectInfo::get_insert_values(self, self.downcast(instance)?))
    }

    fn get_update_values(&self, instance: &dyn Any) -> Result<Vec<SqlArgument>> {
        Ok(ObjectInfo::get_update_values(self, self.downcast(instance)?))
    }

    fn set_identifier_value(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        let Some(instance) = instance.downcast_mut::<T>() else {
            return Err(self.shape_mismatch());
        };
        ObjectInfo::set_identifier_value(self, instance, value)
    }

    fn has_default_identifier_value(&self, instance: &dyn Any) -> Result<bool> {
        Ok(ObjectInfo::has_default_identifier_value(
            self,
            self.downcast(instance)?,
        ))
    }

    fn verify_instance_for_insert(&self, instance: &dyn Any) -> Result<()> {
        ObjectInfo::verify_instance_for_insert(self, self.downcast(instance)?)
    }
}
