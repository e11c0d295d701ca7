use crate::{
    AnyObjectInfo, Error, MinnowError, Result, Row, RowCursor, RowLabeled, RowNames, SqlArgument,
    TableInfo, Value,
};
use std::any::Any;

/// Object info for results with no mapped type.
///
/// Rows are materialized as [`RowLabeled`], keeping every column. There is no
/// table behind it, so every member needing one is unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicObjectInfo;

impl DynamicObjectInfo {
    pub fn create_row(&self, cursor: &dyn RowCursor) -> Result<RowLabeled> {
        let count = cursor.field_count();
        let labels: RowNames = (0..count).map(|i| cursor.name(i).to_owned()).collect();
        let values = (0..count)
            .map(|i| {
                if cursor.is_null(i) {
                    Ok(Value::Null)
                } else {
                    cursor.value(i)
                }
            })
            .collect::<Result<Row>>()?;
        Ok(RowLabeled::new(labels, values))
    }

    fn unsupported(member: &str) -> Error {
        MinnowError::unsupported(format!("Dynamic rows have no table, `{member}` is not available"))
            .into()
    }
}

impl AnyObjectInfo for DynamicObjectInfo {
    fn type_name(&self) -> &'static str {
        "RowLabeled"
    }

    fn table_info(&self) -> Result<&TableInfo> {
        Err(Self::unsupported("table_info"))
    }

    fn create_instance(&self, cursor: &dyn RowCursor) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(self.create_row(cursor)?))
    }

    fn get_identifier_value(&self, _instance: &dyn Any) -> Result<Value> {
        Err(Self::unsupported("get_identifier_value"))
    }

    fn get_insert_values(&self, _instance: &dyn Any) -> Result<Vec<SqlArgument>> {
        Err(Self::unsupported("get_insert_values"))
    }

    fn get_update_values(&self, _instance: &dyn Any) -> Result<Vec<SqlArgument>> {
        Err(Self::unsupported("get_update_values"))
    }

    fn set_identifier_value(&self, _instance: &mut dyn Any, _value: Value) -> Result<()> {
        Err(Self::unsupported("set_identifier_value"))
    }

    fn has_default_identifier_value(&self, _instance: &dyn Any) -> Result<bool> {
        Err(Self::unsupported("has_default_identifier_value"))
    }

    fn verify_instance_for_insert(&self, _instance: &dyn Any) -> Result<()> {
        Err(Self::unsupported("verify_instance_for_insert"))
    }
}
