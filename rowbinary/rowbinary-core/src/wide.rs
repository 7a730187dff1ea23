//! 256-bit integer support.
//!
//! Signed 256-bit values use [`arrow_buffer::i256`]; the unsigned counterpart
//! is [`U256`], stored as four little-endian 64-bit limbs.

use std::{cmp::Ordering, fmt, str::FromStr};

use arrow_buffer::i256;

/// Unsigned 256-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]);

/// Error returned when parsing a [`U256`] or a 256-bit signed literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWideIntError {
    #[error("empty integer literal")]
    Empty,
    #[error("invalid digit in integer literal")]
    InvalidDigit,
    #[error("integer literal out of range")]
    OutOfRange,
}

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub const fn from_u128(v: u128) -> Self {
        U256([v as u64, (v >> 64) as u64, 0, 0])
    }

    pub fn to_u128(self) -> Option<u128> {
        if self.0[2] != 0 || self.0[3] != 0 {
            return None;
        }
        Some(self.0[0] as u128 | (self.0[1] as u128) << 64)
    }

    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            *limb = u64::from_le_bytes(chunk);
        }
        U256(limbs)
    }

    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    pub fn is_zero(self) -> bool {
        self == U256::ZERO
    }

    /// Reinterprets a non-negative `i256` as unsigned.
    pub fn from_i256(v: i256) -> Option<Self> {
        if v.is_negative() {
            return None;
        }
        Some(U256::from_le_bytes(v.to_le_bytes()))
    }

    /// Converts to `i256` when the value is at most `i256::MAX`.
    pub fn to_i256(self) -> Option<i256> {
        if self.0[3] >> 63 != 0 {
            return None;
        }
        Some(i256::from_le_bytes(self.to_le_bytes()))
    }

    pub fn checked_mul_u64(self, rhs: u64) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut carry = 0u128;
        for (i, limb) in self.0.iter().enumerate() {
            let wide = *limb as u128 * rhs as u128 + carry;
            out[i] = wide as u64;
            carry = wide >> 64;
        }
        (carry == 0).then_some(U256(out))
    }

    pub fn checked_add_u64(self, rhs: u64) -> Option<Self> {
        let mut out = self.0;
        let mut carry = rhs;
        for limb in out.iter_mut() {
            if carry == 0 {
                break;
            }
            let (sum, overflow) = limb.overflowing_add(carry);
            *limb = sum;
            carry = overflow as u64;
        }
        (carry == 0).then_some(U256(out))
    }

    /// Returns `(self / rhs, self % rhs)`; `rhs` must be non-zero.
    pub fn div_rem_u64(self, rhs: u64) -> (Self, u64) {
        let mut out = [0u64; 4];
        let mut rem = 0u128;
        for i in (0..4).rev() {
            let cur = rem << 64 | self.0[i] as u128;
            out[i] = (cur / rhs as u128) as u64;
            rem = cur % rhs as u128;
        }
        (U256(out), rem as u64)
    }

    pub fn to_f64(self) -> f64 {
        self.0
            .iter()
            .enumerate()
            .map(|(i, limb)| *limb as f64 * 2f64.powi(64 * i as i32))
            .sum()
    }

    /// Parses an unsigned decimal literal without sign.
    fn parse_digits(s: &str) -> Result<Self, ParseWideIntError> {
        if s.is_empty() {
            return Err(ParseWideIntError::Empty);
        }
        let mut acc = U256::ZERO;
        for b in s.bytes() {
            if !b.is_ascii_digit() {
                return Err(ParseWideIntError::InvalidDigit);
            }
            acc = acc
                .checked_mul_u64(10)
                .and_then(|v| v.checked_add_u64((b - b'0') as u64))
                .ok_or(ParseWideIntError::OutOfRange)?;
        }
        Ok(acc)
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        U256::from_u128(v)
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256([v, 0, 0, 0])
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.pad("0");
        }
        let mut digits = Vec::with_capacity(78);
        let mut cur = *self;
        while !cur.is_zero() {
            let (q, r) = cur.div_rem_u64(10);
            digits.push(b'0' + r as u8);
            cur = q;
        }
        digits.reverse();
        let s = String::from_utf8(digits).map_err(|_| fmt::Error)?;
        f.pad(&s)
    }
}

impl FromStr for U256 {
    type Err = ParseWideIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::parse_digits(s.strip_prefix('+').unwrap_or(s))
    }
}

/// Splits a signed 256-bit value into sign and magnitude.
pub fn i256_to_sign_magnitude(v: i256) -> (bool, U256) {
    if v.is_negative() {
        (true, U256::from_le_bytes(v.wrapping_neg().to_le_bytes()))
    } else {
        (false, U256::from_le_bytes(v.to_le_bytes()))
    }
}

/// Rebuilds a signed 256-bit value from sign and magnitude.
pub fn i256_from_sign_magnitude(negative: bool, magnitude: U256) -> Option<i256> {
    const MIN_MAGNITUDE: U256 = U256([0, 0, 0, 1 << 63]);
    if !negative || magnitude.is_zero() {
        return magnitude.to_i256();
    }
    match magnitude.cmp(&MIN_MAGNITUDE) {
        Ordering::Greater => None,
        _ => Some(i256::from_le_bytes(magnitude.to_le_bytes()).wrapping_neg()),
    }
}

/// Parses a signed decimal literal into an `i256`.
pub fn parse_i256(s: &str) -> Result<i256, ParseWideIntError> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = U256::parse_digits(digits)?;
    i256_from_sign_magnitude(negative, magnitude).ok_or(ParseWideIntError::OutOfRange)
}
