pub use minnow_core::*;
pub use minnow_macros::*;
