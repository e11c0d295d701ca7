mod as_value;
mod builder;
mod combine;
mod db_type;
mod error;
mod mapping;
mod object_info;
mod row;
mod sql_argument;
mod sql_characters;
mod sql_query;
pub mod sql_utility;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use builder::*;
pub use combine::*;
pub use db_type::*;
pub use error::*;
pub use mapping::*;
pub use object_info::*;
pub use row::*;
pub use sql_argument::*;
pub use sql_characters::*;
pub use sql_query::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
