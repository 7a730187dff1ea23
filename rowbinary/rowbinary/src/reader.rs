//! Row-at-a-time RowBinary reader.

use bytes::Buf;
use rowbinary_codec::{
    ValueDecoder,
    varint::{read_len, read_string},
};
use rowbinary_core::{CodecError, TypeDescriptor, Value};
use rowbinary_typename::parse_type_name;
use tracing::debug;

use crate::{
    error::FormatError,
    format::{Column, Format},
    options::ReaderOptions,
};

/// Reads rows from a byte cursor, one [`Value`] per column.
///
/// The header, if the format has one, is consumed by [`RowReader::new`].
/// After an error the reader is fused and yields no more rows.
pub struct RowReader<B> {
    buf: B,
    columns: Vec<Column>,
    decoder: ValueDecoder,
    rows_read: u64,
    failed: bool,
}

impl<B: Buf> RowReader<B> {
    /// Create a reader over `buf`.
    ///
    /// `schema` is required for `RowBinary` and `RowBinaryWithNames`. For
    /// `RowBinaryWithNamesAndTypes` it may be empty; when given, the header
    /// types must match it.
    pub fn new(mut buf: B, options: &ReaderOptions, schema: &[Column]) -> Result<Self, FormatError> {
        let format = options.format;
        if !format.is_readable() {
            return Err(FormatError::NotReadable { format });
        }
        if schema.is_empty() && !format.has_types() {
            return Err(FormatError::MissingSchema { format });
        }

        let columns = if format.has_names() {
            let header = read_header(&mut buf, format)?;
            debug!(
                %format,
                columns = header.len(),
                names = ?header.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
                "parsed header"
            );
            resolve_header(header, schema)?
        } else {
            schema.to_vec()
        };

        Ok(Self {
            buf,
            columns,
            decoder: ValueDecoder::new(options.codec),
            rows_read: 0,
            failed: false,
        })
    }

    /// Columns in row order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Read the next row. Returns `Ok(None)` when the input ends on a row
    /// boundary.
    pub fn next_row(&mut self) -> Result<Option<Vec<Value>>, FormatError> {
        if self.failed || !self.buf.has_remaining() || self.columns.is_empty() {
            return Ok(None);
        }
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            match self.decoder.decode(&mut self.buf, &column.ty) {
                Ok(value) => row.push(value),
                Err(source) => {
                    self.failed = true;
                    return Err(FormatError::Value {
                        row: self.rows_read,
                        column: column.name.clone(),
                        source,
                    });
                }
            }
        }
        self.rows_read += 1;
        Ok(Some(row))
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl<B: Buf> Iterator for RowReader<B> {
    type Item = Result<Vec<Value>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

/// Header as written: names, plus parsed types when the format has them.
type Header = Vec<(String, Option<TypeDescriptor>)>;

fn read_header<B: Buf>(buf: &mut B, format: Format) -> Result<Header, FormatError> {
    let header_error = |source: CodecError| FormatError::Header { format, source };

    let count = read_len(buf).map_err(header_error)?;
    let mut names = Vec::with_capacity(count.min(buf.remaining()));
    for _ in 0..count {
        names.push(read_string(buf).map_err(header_error)?);
    }
    if !format.has_types() {
        return Ok(names.into_iter().map(|name| (name, None)).collect());
    }

    let mut header = Vec::with_capacity(names.len());
    for name in names {
        let type_name = read_string(buf).map_err(header_error)?;
        let ty = parse_type_name(&type_name)?;
        header.push((name, Some(ty)));
    }
    Ok(header)
}

/// Orders the schema by the header and checks header types against it.
fn resolve_header(header: Header, schema: &[Column]) -> Result<Vec<Column>, FormatError> {
    header
        .into_iter()
        .map(|(name, ty)| {
            let known = schema.iter().find(|c| c.name == name);
            match (known, ty) {
                (Some(column), Some(ty)) if column.ty != ty => Err(FormatError::ColumnMismatch {
                    name,
                    expected: column.ty.to_string(),
                    actual: ty.to_string(),
                }),
                (Some(column), _) => Ok(column.clone()),
                (None, Some(ty)) if schema.is_empty() => Ok(Column::new(name, ty)),
                (None, _) => Err(FormatError::UnknownColumn { name }),
            }
        })
        .collect()
}
