//! Row-at-a-time RowBinary writer.

use bytes::BufMut;
use rowbinary_codec::{
    ValueEncoder,
    varint::{write_len, write_string},
};
use rowbinary_core::{CodecError, Value};
use tracing::debug;

use crate::{
    error::FormatError,
    format::{Column, Format},
    options::WriterOptions,
};

/// Appends rows to a byte sink.
///
/// The header, if the format has one, is written by [`RowWriter::new`].
/// When [`write_row`](Self::write_row) fails the sink holds a partial row;
/// it must be discarded, not sent.
pub struct RowWriter<B> {
    buf: B,
    format: Format,
    columns: Vec<Column>,
    encoder: ValueEncoder,
    rows_written: u64,
}

impl<B: BufMut> RowWriter<B> {
    pub fn new(mut buf: B, options: &WriterOptions, columns: Vec<Column>) -> Result<Self, FormatError> {
        let format = options.format;
        if columns.is_empty() {
            return Err(FormatError::MissingSchema { format });
        }
        if format.has_names() {
            write_header(&mut buf, format, &columns)
                .map_err(|source| FormatError::Header { format, source })?;
            debug!(%format, columns = columns.len(), "wrote header");
        }
        Ok(Self {
            buf,
            format,
            columns,
            encoder: ValueEncoder::new(options.codec),
            rows_written: 0,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Encode one row, one value per column in schema order.
    pub fn write_row(&mut self, row: &[Value]) -> Result<(), FormatError> {
        if row.len() != self.columns.len() {
            return Err(FormatError::RowLength {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row) {
            if self.format == Format::RowBinaryWithDefaults {
                if value.is_null() && column.has_default {
                    self.buf.put_u8(1);
                    continue;
                }
                self.buf.put_u8(0);
            }
            self.encoder
                .encode(&mut self.buf, value, &column.ty)
                .map_err(|source| FormatError::Value {
                    row: self.rows_written,
                    column: column.name.clone(),
                    source,
                })?;
        }
        self.rows_written += 1;
        Ok(())
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

fn write_header<B: BufMut>(buf: &mut B, format: Format, columns: &[Column]) -> Result<(), CodecError> {
    write_len(buf, columns.len())?;
    for column in columns {
        write_string(buf, &column.name)?;
    }
    if format.has_types() {
        for column in columns {
            write_string(buf, &column.ty.to_string())?;
        }
    }
    Ok(())
}
