mod common;

#[cfg(test)]
mod tests {
    use crate::common::{Customer, init_logs, registry};
    use minnow::{
        MinnowError, SqlBuilder, SqlCharacters, SqlQuery, Value, args, delete, execute, insert,
        select, update,
    };

    fn kind(error: &minnow::Error) -> &MinnowError {
        error
            .downcast_ref::<MinnowError>()
            .expect("Expected a MinnowError")
    }

    #[test]
    fn select_where_and_where() {
        let query = select(["Column1"])
            .unwrap()
            .from("Table")
            .unwrap()
            .where_predicate("Column1 = @p0", ["Foo"])
            .unwrap()
            .and_where("Column2 = @p0", ["Bar"])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT Column1 FROM Table WHERE (Column1 = @p0) AND (Column2 = @p1)"
        );
        assert_eq!(query.arguments(), args!["Foo", "Bar"].as_slice());
    }

    #[test]
    fn insert_into_values() {
        let query = insert()
            .unwrap()
            .into("Table")
            .unwrap()
            .value("Column1", "Foo")
            .unwrap()
            .value("Column2", 12)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "INSERT INTO Table (Column1, Column2) VALUES (?, ?)"
        );
        assert_eq!(query.arguments(), args!["Foo", 12].as_slice());

        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .insert()
            .unwrap()
            .into("Sales.Customers")
            .unwrap()
            .value("Name", "Fred")
            .unwrap()
            .value("StatusId", 1)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "INSERT INTO [Sales].[Customers] ([Name], [StatusId]) VALUES (@p0, @p1)"
        );

        let query = SqlBuilder::with_characters(SqlCharacters::POSTGRE_SQL)
            .insert()
            .unwrap()
            .into("Widgets")
            .unwrap()
            .value("Name", "Sprocket")
            .unwrap()
            .value_from_sequence("Id", "widget_seq")
            .unwrap()
            .value("Size", 4)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "INSERT INTO \"Widgets\" (\"Name\", \"Id\", \"Size\") VALUES (:p0, nextval('widget_seq'), :p1)"
        );
        assert_eq!(query.arguments(), args!["Sprocket", 4].as_slice());

        let error = SqlBuilder::with_characters(SqlCharacters::SQLITE)
            .insert()
            .unwrap()
            .into("Widgets")
            .unwrap()
            .value_from_sequence("Id", "widget_seq")
            .err()
            .unwrap();
        assert!(matches!(kind(&error), MinnowError::Unsupported(..)));
    }

    #[test]
    fn select_column_predicates() {
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["CustomerId", "Name"])
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_column("DateOfBirth")
            .unwrap()
            .between(Value::from("1980-01-01"), Value::from("1989-12-31"))
            .unwrap()
            .and_where_column("StatusId")
            .unwrap()
            .not_in_values([3, 4])
            .unwrap()
            .or_where_column("Name")
            .unwrap()
            .is_like("Fr%")
            .unwrap()
            .and_where_column("Email")
            .unwrap()
            .is_not_null()
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [CustomerId], [Name] FROM [Customers] \
             WHERE ([DateOfBirth] BETWEEN @p0 AND @p1) \
             AND ([StatusId] NOT IN (@p2, @p3)) \
             OR ([Name] LIKE @p4) \
             AND ([Email] IS NOT NULL)"
        );
        assert_eq!(query.arguments().len(), 5);
    }

    #[test]
    fn comparison_operators() {
        let compare = |build: fn(SqlBuilder) -> minnow::Result<SqlBuilder>| {
            let builder = select(["*"]).unwrap().from("T").unwrap().where_column("C").unwrap();
            build(builder).unwrap().to_sql_query().unwrap().command_text().to_owned()
        };
        assert_eq!(compare(|v| v.is_equal_to(5)), "SELECT * FROM T WHERE (C = ?)");
        assert_eq!(compare(|v| v.is_not_equal_to(5)), "SELECT * FROM T WHERE (C <> ?)");
        assert_eq!(compare(|v| v.is_greater_than(5)), "SELECT * FROM T WHERE (C > ?)");
        assert_eq!(
            compare(|v| v.is_greater_than_or_equal_to(5)),
            "SELECT * FROM T WHERE (C >= ?)"
        );
        assert_eq!(compare(|v| v.is_less_than(5)), "SELECT * FROM T WHERE (C < ?)");
        assert_eq!(
            compare(|v| v.is_less_than_or_equal_to(5)),
            "SELECT * FROM T WHERE (C <= ?)"
        );
        let query = select(["*"])
            .unwrap()
            .from("T")
            .unwrap()
            .where_column("C")
            .unwrap()
            .is_null()
            .unwrap()
            .or_where_column("D")
            .unwrap()
            .is_not_like("x%")
            .unwrap()
            .and_where_column("E")
            .unwrap()
            .not_between(1, 2)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT * FROM T WHERE (C IS NULL) OR (D NOT LIKE ?) AND (E NOT BETWEEN ? AND ?)"
        );
    }

    #[test]
    fn subqueries() {
        let subquery = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["CustomerId"])
            .unwrap()
            .from("Invoices")
            .unwrap()
            .where_column("Total")
            .unwrap()
            .is_greater_than(1000)
            .unwrap()
            .to_sql_query()
            .unwrap();
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["Name"])
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_column("StatusId")
            .unwrap()
            .is_equal_to(1)
            .unwrap()
            .and_where_column("CustomerId")
            .unwrap()
            .in_query(subquery.clone())
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [Name] FROM [Customers] WHERE ([StatusId] = @p0) \
             AND ([CustomerId] IN (SELECT [CustomerId] FROM [Invoices] WHERE ([Total] > @p1)))"
        );
        assert_eq!(query.arguments(), args![1, 1000].as_slice());

        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["Name"])
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_not_exists(SqlQuery::new(
                "SELECT 1 FROM Invoices WHERE Invoices.CustomerId = Customers.CustomerId",
            ))
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [Name] FROM [Customers] WHERE NOT EXISTS \
             (SELECT 1 FROM Invoices WHERE Invoices.CustomerId = Customers.CustomerId)"
        );
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["Name"])
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_exists(subquery)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [Name] FROM [Customers] \
             WHERE EXISTS (SELECT [CustomerId] FROM [Invoices] WHERE ([Total] > @p0))"
        );
    }

    #[test]
    fn aggregates_group_and_order() {
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["StatusId"])
            .unwrap()
            .count("CustomerId", "Customers")
            .unwrap()
            .max("DateOfBirth", None)
            .unwrap()
            .from("Customers")
            .unwrap()
            .group_by(["StatusId"])
            .unwrap()
            .having("COUNT(CustomerId) > @p0", [10])
            .unwrap()
            .order_by_descending(["StatusId"])
            .unwrap()
            .order_by_ascending(["Customers"])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [StatusId], COUNT([CustomerId]) AS [Customers], MAX([DateOfBirth]) \
             FROM [Customers] GROUP BY [StatusId] HAVING COUNT(CustomerId) > @p0 \
             ORDER BY [StatusId] DESC, [Customers] ASC"
        );

        let query = SqlBuilder::new()
            .count_all(None)
            .unwrap()
            .from("Customers")
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(query.command_text(), "SELECT COUNT(*) FROM Customers");

        let query = SqlBuilder::new()
            .distinct("StatusId")
            .unwrap()
            .sum("Total", "Total")
            .unwrap()
            .average("Total", "Average")
            .unwrap()
            .min("Total", None)
            .unwrap()
            .from("Invoices")
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT DISTINCT StatusId, SUM(Total) AS Total, AVG(Total) AS Average, MIN(Total) FROM Invoices"
        );
    }

    #[test]
    fn update_and_delete() {
        let query = update("Customers")
            .unwrap()
            .set_column_value("Name", "Fred")
            .unwrap()
            .set_column_value("StatusId", 2)
            .unwrap()
            .where_equals("CustomerId", 7)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "UPDATE Customers SET Name = ?, StatusId = ? WHERE CustomerId = ?"
        );
        assert_eq!(query.arguments(), args!["Fred", 2, 7].as_slice());

        let query = SqlBuilder::with_characters(SqlCharacters::POSTGRE_SQL)
            .update("Customers")
            .unwrap()
            .set_column_value("StatusId", 3)
            .unwrap()
            .where_predicate("StatusId = :p0 AND Created < :p1", args![2, "2020-01-01"])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "UPDATE \"Customers\" SET \"StatusId\" = :p0 WHERE (StatusId = :p1 AND Created < :p2)"
        );

        let query = delete()
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_column("StatusId")
            .unwrap()
            .in_values([1, 2, 3])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "DELETE FROM Customers WHERE (StatusId IN (?, ?, ?))"
        );
        let query = SqlBuilder::with_characters(SqlCharacters::MY_SQL)
            .delete()
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_equals("CustomerId", 7)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "DELETE FROM `Customers` WHERE `CustomerId` = @p0"
        );
    }

    #[test]
    fn stored_procedures() {
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .execute("GetCustomersByStatus")
            .unwrap()
            .with_parameter("@StatusId", 1)
            .unwrap()
            .with_parameter("@Active", true)
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "EXEC GetCustomersByStatus @StatusId, @Active"
        );
        assert_eq!(query.arguments().len(), 2);

        let query = execute("Cleanup").unwrap().to_sql_query().unwrap();
        assert_eq!(query.command_text(), "EXEC Cleanup");

        let error = SqlBuilder::with_characters(SqlCharacters::SQLITE)
            .execute("Cleanup")
            .err()
            .unwrap();
        assert!(matches!(kind(&error), MinnowError::Unsupported(..)));
        let error = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .execute(" ")
            .err()
            .unwrap();
        assert!(matches!(kind(&error), MinnowError::Argument(..)));
    }

    #[test]
    fn illegal_transitions() {
        init_logs();
        let invalid = |result: minnow::Result<SqlBuilder>| {
            let error = result.err().expect("The call must be rejected");
            assert!(
                matches!(kind(&error), MinnowError::InvalidOperation(..)),
                "{error:#}"
            );
        };
        invalid(SqlBuilder::new().from("T"));
        invalid(select(["A"]).and_then(|v| v.where_predicate("A = 1", args![])));
        invalid(select(["A"]).and_then(|v| v.select(["B"])));
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.and_where("A = 1", args![])),
        );
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.where_column("A"))
                .and_then(|v| v.where_column("B")),
        );
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.is_equal_to(1)),
        );
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.having("COUNT(A) > 1", args![])),
        );
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.where_equals("A", 1)),
        );
        invalid(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.order_by_ascending(["A"]))
                .and_then(|v| v.where_predicate("A = 1", args![])),
        );
        invalid(update("T").and_then(|v| v.order_by_ascending(["A"])));
        invalid(insert().and_then(|v| v.value("A", 1)));
        invalid(delete().and_then(|v| v.group_by(["A"])));
        invalid(SqlBuilder::new().from_type::<Customer>());
        invalid(
            SqlBuilder::new()
                .distinct("A")
                .and_then(|v| v.from("T"))
                .and_then(|v| v.count_all(None)),
        );
        invalid(SqlBuilder::new().with_parameter("@A", 1));
    }

    #[test]
    fn incomplete_statements() {
        let incomplete = |builder: minnow::Result<SqlBuilder>| {
            let error = builder
                .and_then(|v| v.to_sql_query())
                .err()
                .expect("The statement is incomplete");
            assert!(matches!(kind(&error), MinnowError::InvalidOperation(..)));
        };
        incomplete(Ok(SqlBuilder::new()));
        incomplete(select(["A"]));
        incomplete(delete());
        incomplete(insert());
        incomplete(insert().and_then(|v| v.into("T")));
        incomplete(update("T"));
        incomplete(
            select(["A"])
                .and_then(|v| v.from("T"))
                .and_then(|v| v.where_column("A")),
        );
        let error = select(Vec::<&str>::new())
            .and_then(|v| v.from("T"))
            .err()
            .expect("The select list is empty");
        assert!(matches!(kind(&error), MinnowError::InvalidOperation(..)));
    }

    #[test]
    fn argument_errors() {
        let error = select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_predicate("A = @p0 AND B = @p1", ["x"]))
            .err()
            .expect("Two parameters, one argument");
        assert!(matches!(kind(&error), MinnowError::ShapeMismatch(..)));

        let error = select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_predicate("  ", args![]))
            .err()
            .expect("Empty predicate");
        assert!(matches!(kind(&error), MinnowError::Argument(..)));

        let error = select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_column(""))
            .err()
            .expect("Empty column");
        assert!(matches!(kind(&error), MinnowError::Argument(..)));

        let error = select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_column("A"))
            .and_then(|v| v.in_values(Vec::<i32>::new()))
            .err()
            .expect("Empty list");
        assert!(matches!(kind(&error), MinnowError::Argument(..)));

        let error = select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.group_by(Vec::<&str>::new()))
            .err()
            .expect("Empty group by");
        assert!(matches!(kind(&error), MinnowError::Argument(..)));

        let error = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_predicate("A = ? AND B = @p0", args![1, 2]))
            .err()
            .expect("Positional and named markers together");
        assert!(matches!(kind(&error), MinnowError::ShapeMismatch(..)));

        let error = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_column("A"))
            .and_then(|v| {
                v.in_query(SqlQuery::with_arguments(
                    "SELECT A FROM U WHERE B = @p0 AND C = @p1",
                    args![1],
                ))
            })
            .err()
            .expect("Subquery missing an argument");
        assert!(matches!(kind(&error), MinnowError::ShapeMismatch(..)));

        let error = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["A"])
            .and_then(|v| v.from("T"))
            .and_then(|v| v.where_exists(SqlQuery::new("SELECT 1 FROM U WHERE B = @p0")))
            .err()
            .expect("Subquery without its argument");
        assert!(matches!(kind(&error), MinnowError::ShapeMismatch(..)));
    }

    #[test]
    fn repeated_markers_share_arguments() {
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["*"])
            .unwrap()
            .from("Customers")
            .unwrap()
            .where_column("StatusId")
            .unwrap()
            .is_equal_to(1)
            .unwrap()
            .and_where("Name = @p0 OR @p0 IS NULL", ["Fred"])
            .unwrap()
            .or_where("Created > @p0", [Value::from("2020-01-01")])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT * FROM [Customers] WHERE ([StatusId] = @p0) \
             AND (Name = @p1 OR @p1 IS NULL) OR (Created > @p2)"
        );
        assert_eq!(query.arguments().len(), 3);
    }

    #[test]
    fn builder_is_reusable_as_prefix() {
        let base = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .select(["Name"])
            .unwrap()
            .from("Customers")
            .unwrap();
        let first = base
            .clone()
            .where_column("StatusId")
            .unwrap()
            .is_equal_to(1)
            .unwrap()
            .to_sql_query()
            .unwrap();
        let second = base.to_sql_query().unwrap();
        assert_eq!(first.arguments().len(), 1);
        assert_eq!(second.command_text(), "SELECT [Name] FROM [Customers]");
        assert!(second.arguments().is_empty());
    }

    #[test]
    fn select_from_mapped_type() {
        let registry = registry();
        let query = SqlBuilder::with_characters(SqlCharacters::MS_SQL)
            .with_registry(registry.clone())
            .select(["*"])
            .unwrap()
            .from_type::<Customer>()
            .unwrap()
            .order_by_ascending(["Name"])
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT [CustomerId], [Name], [DateOfBirth], [StatusId], [Created], [email] \
             FROM [Sales].[Customers] ORDER BY [Name] ASC"
        );
        assert_eq!(registry.len(), 1);

        let query = SqlBuilder::new()
            .with_registry(registry)
            .count_all("Total")
            .unwrap()
            .from_type::<Customer>()
            .unwrap()
            .to_sql_query()
            .unwrap();
        assert_eq!(
            query.command_text(),
            "SELECT COUNT(*) AS Total FROM Sales.Customers"
        );
    }
}
