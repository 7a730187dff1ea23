//! Wire-independent core of the RowBinary codec.
//!
//! This crate provides the column type model ([`TypeDescriptor`] / [`DataType`]),
//! the [`Value`] sum type exchanged with the codec, the error taxonomy, and the
//! [`Coercion`] rules that bridge loosely typed inputs to exact wire kinds.

mod coerce;
mod decimal;
mod error;
mod schema;
pub mod time;
mod value;
mod wide;

pub use arrow_buffer::i256;
pub use chrono_tz::Tz;
pub use coerce::{Coercion, FromValue, matches_natively};
pub use decimal::{Decimal, MAX_DECIMAL_PRECISION, pow10};
pub use error::{CodecError, ErrorKind, ValueTypeError};
pub use schema::{DataType, DecimalWidth, EnumTable, IntervalUnit, TypeDescriptor};
pub use value::{Interval, Value};
pub use wide::{ParseWideIntError, U256, parse_i256};
