//! Byte-level RowBinary codec built on `rowbinary-core`.
//!
//! Key components:
//! - [`ValueDecoder`]: byte cursor + [`TypeDescriptor`] → [`Value`]
//! - [`ValueEncoder`]: [`Value`] + [`TypeDescriptor`] → bytes, coercing inputs first
//! - [`read_type_tag`] / [`write_type_tag`]: binary type encoding used by `Dynamic`
//! - [`infer_type`]: descriptor of a runtime value written into `Dynamic`
//! - [`varint`]: LEB128 length prefixes

mod decoder;
mod encoder;
mod infer;
mod options;
mod type_tag;
pub mod varint;

use bytes::{Buf, BufMut};
pub use decoder::{
    MAX_VALUE_DEPTH, MAX_ZERO_WIDTH_ITEMS, VARIANT_NULL_DISCRIMINATOR, ValueDecoder,
};
pub use encoder::ValueEncoder;
pub use infer::infer_type;
pub use options::CodecOptions;
pub use rowbinary_core::{CodecError, TypeDescriptor, Value};
pub use type_tag::{DEFAULT_DYNAMIC_MAX_TYPES, read_type_tag, tag, write_type_tag};

/// Decodes one value with default [`CodecOptions`].
pub fn decode<B: Buf>(buf: &mut B, ty: &TypeDescriptor) -> Result<Value, CodecError> {
    ValueDecoder::default().decode(buf, ty)
}

/// Encodes one value with default [`CodecOptions`].
pub fn encode<B: BufMut>(buf: &mut B, value: &Value, ty: &TypeDescriptor) -> Result<(), CodecError> {
    ValueEncoder::default().encode(buf, value, ty)
}
