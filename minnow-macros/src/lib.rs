mod decode_column;
mod decode_table;
mod mapped_trait;

use decode_table::decode_table;
use mapped_trait::mapped_trait;
use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

/// Generates the `Mapped` implementation of a struct.
///
/// Struct attributes: `#[minnow(table = "..", schema = "..")]`. Field
/// attributes: `column` or `column = ".."`, `identifier` or
/// `identifier = "assigned" | "db_generated" | "sequence"`, `sequence = ".."`,
/// `insert = false`, `update = false`, `db_type = DbTypeVariant`, `version`
/// and `ignore`. Every field type must implement `AsValue` and `Clone`.
#[proc_macro_derive(Mapped, attributes(minnow))]
pub fn derive_mapped(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let table = decode_table(item);
    mapped_trait(&table).into()
}
