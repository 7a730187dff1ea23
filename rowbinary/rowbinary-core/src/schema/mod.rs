//! Column type descriptors.

mod format;
mod types;

pub use types::{DataType, DecimalWidth, EnumTable, IntervalUnit, TypeDescriptor};
