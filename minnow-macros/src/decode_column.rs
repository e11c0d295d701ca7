use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, Ident, LitBool, LitStr, Token, Type, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) nullable: bool,
    /// Some attribute other than `ignore` was found.
    pub(crate) marked: bool,
    pub(crate) name: Option<String>,
    pub(crate) identifier: Option<TokenStream>,
    pub(crate) sequence: Option<String>,
    pub(crate) allow_insert: bool,
    pub(crate) allow_update: bool,
    pub(crate) db_type: Option<Ident>,
    pub(crate) version: bool,
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|v| v.ident == "Option")
}

fn identifier_strategy(value: &str) -> TokenStream {
    match value.to_ascii_lowercase().as_str() {
        "assigned" => quote!(::minnow::IdentifierStrategy::Assigned),
        "db_generated" | "dbgenerated" | "identity" => {
            quote!(::minnow::IdentifierStrategy::DbGenerated)
        }
        "sequence" => quote!(::minnow::IdentifierStrategy::Sequence),
        _ => panic!(
            "Unknown identifier strategy `{value}`, expected one of: assigned, db_generated, identity, sequence"
        ),
    }
}

/// `None` for fields marked `#[minnow(ignore)]`.
pub(crate) fn decode_column(field: &Field) -> Option<ColumnMetadata> {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        nullable: is_option(&field.ty),
        marked: false,
        name: None,
        identifier: None,
        sequence: None,
        allow_insert: true,
        allow_update: true,
        db_type: None,
        version: false,
    };
    let mut ignore = false;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("minnow") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `minnow`, use it like: `#[minnow(attribute = value, ..)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            let has_value = arg.input.peek(Token![=]);
            if arg.path.is_ident("ignore") {
                ignore = true;
                return Ok(());
            }
            metadata.marked = true;
            if arg.path.is_ident("column") {
                if has_value {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `column`, use it like: `#[minnow(column = \"CustomerId\")]`");
                    };
                    metadata.name = Some(v.value());
                }
            } else if arg.path.is_ident("identifier") {
                metadata.identifier = Some(if has_value {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `identifier`, use it like: `#[minnow(identifier = \"assigned\")]`");
                    };
                    identifier_strategy(&v.value())
                } else {
                    quote!(::minnow::IdentifierStrategy::DbGenerated)
                });
            } else if arg.path.is_ident("sequence") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `sequence`, use it like: `#[minnow(identifier = \"sequence\", sequence = \"customer_seq\")]`");
                };
                metadata.sequence = Some(v.value());
            } else if arg.path.is_ident("insert") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitBool>) else {
                    panic!("Error while parsing `insert`, use it like: `#[minnow(insert = false)]`");
                };
                metadata.allow_insert = v.value;
            } else if arg.path.is_ident("update") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitBool>) else {
                    panic!("Error while parsing `update`, use it like: `#[minnow(update = false)]`");
                };
                metadata.allow_update = v.value;
            } else if arg.path.is_ident("db_type") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Ident>) else {
                    panic!("Error while parsing `db_type`, use it like: `#[minnow(db_type = AnsiString)]`");
                };
                metadata.db_type = Some(v);
            } else if arg.path.is_ident("version") {
                metadata.version = true;
            } else {
                panic!(
                    "Unknown attribute `{}` inside minnow macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    if ignore && metadata.marked {
        panic!(
            "Field `{}` is ignored, it cannot carry other minnow attributes",
            metadata.ident
        );
    }
    (!ignore).then_some(metadata)
}
