//! Unsigned LEB128 length prefixes.

use bytes::{Buf, BufMut};
use rowbinary_core::CodecError;

/// Longest encoding accepted: 9 bytes carry 63 payload bits.
pub const MAX_VARINT_LEN: usize = 9;

pub fn read_varint<B: Buf>(buf: &mut B) -> Result<u64, CodecError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = buf.try_get_u8()?;
        value |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::invalid(
        "VarInt",
        format!("continuation past {MAX_VARINT_LEN} bytes"),
    ))
}

pub fn write_varint<B: BufMut>(buf: &mut B, mut value: u64) -> Result<(), CodecError> {
    if value >> 63 != 0 {
        return Err(CodecError::overflow(value, "VarInt"));
    }
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
    Ok(())
}

/// Reads a length or count prefix as `usize`.
pub fn read_len<B: Buf>(buf: &mut B) -> Result<usize, CodecError> {
    let len = read_varint(buf)?;
    usize::try_from(len).map_err(|_| CodecError::overflow(len, "usize"))
}

pub fn write_len<B: BufMut>(buf: &mut B, len: usize) -> Result<(), CodecError> {
    write_varint(buf, len as u64)
}

/// Length-prefixed UTF-8 string.
pub fn read_string<B: Buf>(buf: &mut B) -> Result<String, CodecError> {
    let bytes = read_bytes(buf)?;
    String::from_utf8(bytes).map_err(|e| CodecError::invalid("String", e.to_string()))
}

pub fn write_string<B: BufMut>(buf: &mut B, s: &str) -> Result<(), CodecError> {
    write_len(buf, s.len())?;
    buf.put_slice(s.as_bytes());
    Ok(())
}

/// Length-prefixed raw bytes.
pub fn read_bytes<B: Buf>(buf: &mut B) -> Result<Vec<u8>, CodecError> {
    let len = read_len(buf)?;
    read_exact(buf, len)
}

/// Exactly `len` bytes; fails before allocating when the cursor is shorter.
pub fn read_exact<B: Buf>(buf: &mut B, len: usize) -> Result<Vec<u8>, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Truncated {
            needed: len,
            available: buf.remaining(),
        });
    }
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}
