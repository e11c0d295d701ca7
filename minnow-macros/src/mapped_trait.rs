use crate::decode_table::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;

fn optional_string(value: &Option<String>) -> TokenStream {
    match value {
        Some(v) => quote!(::std::option::Option::Some(::std::string::String::from(#v))),
        None => quote!(::std::option::Option::None),
    }
}

pub(crate) fn mapped_trait(table: &TableMetadata) -> TokenStream {
    let name = &table.item.ident;
    let type_name = name.to_string();
    let table_attribute = match &table.name {
        Some(table_name) => {
            let schema = optional_string(&table.schema);
            quote! {
                ::std::option::Option::Some(::minnow::TableAttribute {
                    name: ::std::string::String::from(#table_name),
                    schema: #schema,
                })
            }
        }
        None => quote!(::std::option::Option::None),
    };
    let properties = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let property = ident.to_string();
        let nullable = c.nullable;
        let column = if c.marked {
            let column_name = optional_string(&c.name);
            let identifier = match &c.identifier {
                Some(v) => quote!(::std::option::Option::Some(#v)),
                None => quote!(::std::option::Option::None),
            };
            let sequence = optional_string(&c.sequence);
            let allow_insert = c.allow_insert;
            let allow_update = c.allow_update;
            let db_type = match &c.db_type {
                Some(v) => quote!(::std::option::Option::Some(::minnow::DbType::#v)),
                None => quote!(::std::option::Option::None),
            };
            let version = c.version;
            quote! {
                ::std::option::Option::Some(::minnow::ColumnAttribute {
                    name: #column_name,
                    identifier: #identifier,
                    sequence: #sequence,
                    allow_insert: #allow_insert,
                    allow_update: #allow_update,
                    db_type: #db_type,
                    version: #version,
                })
            }
        } else {
            quote!(::std::option::Option::None)
        };
        quote! {
            (
                ::minnow::PropertyDescriptor {
                    name: #property,
                    value: <#ty as ::minnow::AsValue>::as_empty_value(),
                    nullable: #nullable,
                    column: #column,
                },
                ::minnow::PropertyAccessor::new(
                    |instance: &Self| {
                        ::minnow::AsValue::as_value(::std::clone::Clone::clone(&instance.#ident))
                    },
                    |instance: &mut Self, value: ::minnow::Value| {
                        instance.#ident = <#ty as ::minnow::AsValue>::try_from_value(value)?;
                        ::std::result::Result::Ok(())
                    },
                ),
            )
        }
    });
    quote! {
        impl ::minnow::Mapped for #name {
            fn type_definition() -> ::minnow::TypeDefinition<Self> {
                #[allow(unused_imports)]
                use ::minnow::NoConstructor as _;
                ::minnow::TypeDefinition::new(
                    #type_name,
                    #table_attribute,
                    ::std::vec![#(#properties),*],
                    ::minnow::ConstructorProbe::<Self>::new().constructor(),
                )
            }
        }
    }
}
