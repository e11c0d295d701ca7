#![allow(dead_code)]

use log::LevelFilter;
use minnow::{Mapped, ObjectInfoRegistry};
use rust_decimal::Decimal;
use std::{env, sync::Arc};
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Registry private to one test, the global one is shared by the whole binary.
pub fn registry() -> Arc<ObjectInfoRegistry> {
    Arc::new(ObjectInfoRegistry::default())
}

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
#[minnow(table = "Customers", schema = "Sales")]
pub struct Customer {
    #[minnow(identifier, column = "CustomerId")]
    pub id: i32,
    #[minnow(column = "Name")]
    pub name: String,
    #[minnow(column = "DateOfBirth")]
    pub date_of_birth: Option<Date>,
    #[minnow(column = "StatusId")]
    pub status_id: i32,
    #[minnow(column = "Created", update = false)]
    pub created: Option<PrimitiveDateTime>,
    #[minnow(column)]
    pub email: Option<String>,
    pub cached_total: Option<Decimal>,
}

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
#[minnow(table = "Invoices")]
pub struct Invoice {
    #[minnow(identifier = "sequence", sequence = "invoice_seq", column = "InvoiceId")]
    pub id: i64,
    #[minnow(column = "CustomerId")]
    pub customer_id: i32,
    #[minnow(column = "Number", db_type = AnsiString)]
    pub number: String,
    #[minnow(column = "Total")]
    pub total: Decimal,
    #[minnow(column = "RowVersion", insert = false, update = false, version)]
    pub row_version: i64,
}

#[derive(Mapped, Debug, Default, Clone, PartialEq)]
#[minnow(table = "Products")]
pub struct Product {
    #[minnow(identifier = "assigned", column = "Code")]
    pub code: Uuid,
    #[minnow(column = "Description")]
    pub description: String,
    #[minnow(column = "Price")]
    pub price: Decimal,
}

/// Mapped by name only, no markers.
#[derive(Mapped, Debug, Default, Clone, PartialEq)]
pub struct CreditCard {
    pub credit_card_id: i32,
    pub holder_name: String,
    pub expires_on: Option<Date>,
    #[minnow(ignore)]
    pub masked: String,
}
