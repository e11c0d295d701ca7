use crate::decode_column::{ColumnMetadata, decode_column};
use quote::ToTokens;
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    /// Explicit `table = ".."`, `None` leaves the name to the convention.
    pub(crate) name: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) columns: Vec<ColumnMetadata>,
}

pub(crate) fn decode_table(item: ItemStruct) -> TableMetadata {
    let Fields::Named(fields) = &item.fields else {
        panic!("Mapped can only be derived on structs with named fields");
    };
    let columns = fields
        .named
        .iter()
        .filter_map(decode_column)
        .collect();
    let mut name = None;
    let mut schema = None;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("minnow") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `minnow`, use it like: `#[minnow(attribute = value, ..)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `table`, use it like: `#[minnow(table = \"Customers\")]`"
                        );
                    };
                    name = Some(value.value());
                } else if arg.path.is_ident("schema") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `schema`, use it like: `#[minnow(schema = \"Sales\")]`"
                        );
                    };
                    schema = Some(value.value());
                } else {
                    panic!(
                        "Unknown attribute `{}` inside minnow macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    if schema.is_some() && name.is_none() {
        panic!("`schema` needs a `table` next to it: `#[minnow(table = \"Customers\", schema = \"Sales\")]`");
    }
    TableMetadata {
        item,
        name,
        schema,
        columns,
    }
}
