mod attribute;
mod column_info;
mod convention;
mod identifier_strategy;
mod inflection;
mod table_info;
mod type_definition;

pub use attribute::*;
pub use column_info::*;
pub use convention::*;
pub use identifier_strategy::*;
pub use inflection::*;
pub use table_info::*;
pub use type_definition::*;

use crate::{MinnowError, Result};

/// Shared by every convention: a mapped type must be constructible without
/// arguments.
pub(crate) fn check_constructor(descriptor: &TypeDescriptor) -> Result<()> {
    if !descriptor.has_constructor {
        return Err(MinnowError::configuration(format!(
            "Type `{}` has no parameterless constructor, derive or implement `Default`",
            descriptor.type_name
        ))
        .into());
    }
    Ok(())
}
