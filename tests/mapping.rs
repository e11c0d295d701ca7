mod common;

#[cfg(test)]
mod tests {
    use crate::common::{CreditCard, Customer, Invoice, Product, init_logs, registry};
    use minnow::{
        ConventionMappingConvention, ConventionMappingSettings, DbType, IdentifierStrategy,
        Mapped, MinnowError, ObjectInfo, ObjectInfoRegistry, SqlBuilder, Value,
    };
    use std::sync::Arc;

    fn names<'a>(columns: impl Iterator<Item = &'a minnow::ColumnInfo>) -> Vec<&'a str> {
        columns.map(|v| v.column_name.as_str()).collect()
    }

    #[test]
    fn derived_descriptor() {
        let definition = Customer::type_definition();
        let descriptor = definition.descriptor();
        assert_eq!(descriptor.type_name, "Customer");
        assert!(descriptor.has_constructor);
        let table = descriptor.table.as_ref().expect("Customer has a table attribute");
        assert_eq!(table.name, "Customers");
        assert_eq!(table.schema.as_deref(), Some("Sales"));
        assert_eq!(descriptor.properties.len(), 7);

        let id = descriptor.property("id").unwrap();
        assert!(!id.nullable);
        assert!(matches!(id.value, Value::Int32(None)));
        let column = id.column.as_ref().unwrap();
        assert_eq!(column.name.as_deref(), Some("CustomerId"));
        assert_eq!(column.identifier, Some(IdentifierStrategy::DbGenerated));

        let date_of_birth = descriptor.property("date_of_birth").unwrap();
        assert!(date_of_birth.nullable);
        assert!(matches!(date_of_birth.value, Value::Date(None)));

        let created = descriptor.property("created").unwrap();
        assert!(matches!(created.value, Value::Timestamp(None)));
        assert!(!created.column.as_ref().unwrap().allow_update);
        assert!(created.column.as_ref().unwrap().allow_insert);

        let email = descriptor.property("email").unwrap();
        assert_eq!(email.column.as_ref().unwrap().name, None);
        assert!(descriptor.property("cached_total").unwrap().column.is_none());

        let card = CreditCard::type_definition();
        assert!(card.descriptor().property("masked").is_none());
        assert!(card.descriptor().table.is_none());
        assert!(card.accessor("holder_name").is_some());
        assert!(card.accessor("masked").is_none());
    }

    #[test]
    fn derived_accessors() {
        let definition = Customer::type_definition();
        let accessor = definition.accessor("name").unwrap();
        let mut customer = Customer::default();
        (accessor.set)(&mut customer, Value::from("Wilma")).unwrap();
        assert_eq!(customer.name, "Wilma");
        assert_eq!((accessor.get)(&customer), Value::Varchar(Some("Wilma".into())));
        let accessor = definition.accessor("email").unwrap();
        (accessor.set)(&mut customer, Value::from("wilma@example.com")).unwrap();
        assert_eq!(customer.email.as_deref(), Some("wilma@example.com"));
        assert!((accessor.set)(&mut customer, Value::Int32(Some(1))).is_err());
    }

    #[test]
    fn attribute_mapping() {
        init_logs();
        let registry = registry();
        let info = registry.get::<Customer>().unwrap();
        let table = info.table_info();
        assert_eq!(table.qualified_name(), "Sales.Customers");
        assert_eq!(
            names(table.columns().iter()),
            ["CustomerId", "Name", "DateOfBirth", "StatusId", "Created", "email"]
        );
        assert_eq!(
            names(table.insert_columns()),
            ["Name", "DateOfBirth", "StatusId", "Created", "email"]
        );
        assert_eq!(
            names(table.update_columns()),
            ["Name", "DateOfBirth", "StatusId", "email"]
        );
        assert_eq!(table.column("Created").unwrap().db_type, DbType::DateTime);

        let info = registry.get::<Invoice>().unwrap();
        let table = info.table_info();
        assert_eq!(table.qualified_name(), "Invoices");
        assert_eq!(table.identifier_strategy(), IdentifierStrategy::Sequence);
        assert_eq!(
            table.identifier_column().sequence_name.as_deref(),
            Some("invoice_seq")
        );
        assert_eq!(table.column("Number").unwrap().db_type, DbType::AnsiString);
        assert_eq!(table.column("Total").unwrap().db_type, DbType::Decimal);
        assert_eq!(
            table.version_column().map(|v| v.column_name.as_str()),
            Some("RowVersion")
        );
        assert_eq!(names(table.insert_columns()), ["CustomerId", "Number", "Total"]);
        assert_eq!(names(table.update_columns()), ["CustomerId", "Number", "Total"]);

        let info = registry.get::<Product>().unwrap();
        let table = info.table_info();
        assert_eq!(table.identifier_strategy(), IdentifierStrategy::Assigned);
        assert_eq!(table.identifier_column().db_type, DbType::Guid);
        assert_eq!(names(table.insert_columns()), ["Code", "Description", "Price"]);
        assert_eq!(names(table.update_columns()), ["Description", "Price"]);

        assert_eq!(registry.len(), 3);
        let error = registry.get::<CreditCard>().err().unwrap();
        assert!(matches!(
            error.downcast_ref::<MinnowError>(),
            Some(MinnowError::Configuration(..))
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn convention_mapping() {
        let info = ObjectInfo::<CreditCard>::new(&ConventionMappingConvention::default()).unwrap();
        let table = info.table_info();
        assert_eq!(table.name(), "CreditCards");
        assert_eq!(
            names(table.columns().iter()),
            ["CreditCardId", "HolderName", "ExpiresOn"]
        );
        assert_eq!(table.identifier_column().column_name, "CreditCardId");
        assert_eq!(table.identifier_strategy(), IdentifierStrategy::DbGenerated);

        let registry = Arc::new(ObjectInfoRegistry::new(ConventionMappingConvention::new(
            ConventionMappingSettings::lowercase_with_underscores()
                .with_table_schema(|_| Some("billing".into())),
        )));
        let card = registry.get::<CreditCard>().unwrap();
        assert_eq!(card.table_info().qualified_name(), "billing.credit_cards");
        assert_eq!(
            names(card.table_info().columns().iter()),
            ["credit_card_id", "holder_name", "expires_on"]
        );

        // Explicit markers still apply
        let customer = registry.get::<Customer>().unwrap();
        let table = customer.table_info();
        assert_eq!(table.qualified_name(), "Sales.Customers");
        assert_eq!(
            names(table.columns().iter()),
            [
                "CustomerId",
                "Name",
                "DateOfBirth",
                "StatusId",
                "Created",
                "email",
                "cached_total"
            ]
        );
        assert_eq!(table.identifier_column().column_name, "CustomerId");
        assert_eq!(names(table.update_columns()).len(), 5);

        let registry = ObjectInfoRegistry::new(ConventionMappingConvention::new(
            ConventionMappingSettings::uppercase_with_underscores(),
        ));
        let card = registry.get::<CreditCard>().unwrap();
        assert_eq!(card.table_info().name(), "CREDIT_CARDS");
        assert_eq!(
            names(card.table_info().columns().iter()),
            ["CREDIT_CARD_ID", "HOLDER_NAME", "EXPIRES_ON"]
        );
    }

    #[test]
    fn type_without_default() {
        #[derive(minnow::Mapped)]
        #[minnow(table = "Notes")]
        #[allow(dead_code)]
        struct Note {
            #[minnow(identifier)]
            id: i32,
            #[minnow(column = "Text")]
            text: String,
        }

        assert!(!Note::type_definition().descriptor().has_constructor);
        let error = registry().get::<Note>().err().unwrap();
        assert!(matches!(
            error.downcast_ref::<MinnowError>(),
            Some(MinnowError::Configuration(..))
        ));
    }

    #[test]
    fn global_configuration() {
        init_logs();
        ObjectInfoRegistry::configure_global(ConventionMappingConvention::new(
            ConventionMappingSettings::lowercase_with_underscores(),
        ))
        .expect("Nothing is mapped through the global registry yet");
        let query = SqlBuilder::new()
            .select_by_identifier::<CreditCard>(5)
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT credit_card_id, holder_name, expires_on FROM credit_cards WHERE (credit_card_id = ?)"
        );
        assert_eq!(query.arguments().len(), 1);

        let error = ObjectInfoRegistry::configure_global(ConventionMappingConvention::default())
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MinnowError>(),
            Some(MinnowError::InvalidOperation(..))
        ));
        assert!(!ObjectInfoRegistry::global().is_empty());
    }
}
