//! ClickHouse RowBinary reading and writing.
//!
//! [`RowReader`] and [`RowWriter`] frame rows in one of the [`Format`]
//! variants and hand every value to the per-value codec. The building blocks
//! are re-exported as [`core`], [`codec`] and [`typename`].
//!
//! ```text
//! bytes ─ RowReader ─ header (names, type names) ─ ValueDecoder ─ Vec<Value>
//! Vec<Value> ─ RowWriter ─ header ─ ValueEncoder ─ bytes
//! ```

mod error;
mod format;
mod options;
mod reader;
mod writer;

pub use error::FormatError;
pub use format::{Column, Format};
pub use options::{ReaderOptions, WriterOptions};
pub use reader::RowReader;
pub use rowbinary_codec as codec;
pub use rowbinary_core as core;
pub use rowbinary_core::{TypeDescriptor, Value};
pub use rowbinary_typename as typename;
pub use writer::RowWriter;
