//! Fixed-point decimal with a 256-bit unscaled integer.

use std::{fmt, str::FromStr};

use arrow_buffer::i256;

use crate::{
    error::CodecError,
    wide::{ParseWideIntError, U256, i256_from_sign_magnitude, i256_to_sign_magnitude},
};

/// Largest precision any decimal width supports.
pub const MAX_DECIMAL_PRECISION: u8 = 76;

/// Decimal number `unscaled / 10^scale`.
///
/// Equality is structural: `1.20` and `1.2` differ because their scales differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: i256,
    scale: u8,
}

/// `10^exp` as `i256`, or `None` past 10^76.
pub fn pow10(exp: u32) -> Option<i256> {
    let ten = i256::from_i128(10);
    (0..exp).try_fold(i256::ONE, |acc, _| acc.checked_mul(ten))
}

impl Decimal {
    pub fn new(unscaled: i256, scale: u8) -> Self {
        Self { unscaled, scale }
    }

    pub fn from_i128(unscaled: i128, scale: u8) -> Self {
        Self::new(i256::from_i128(unscaled), scale)
    }

    pub fn unscaled(&self) -> i256 {
        self.unscaled
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Number of decimal digits in the unscaled integer (`0` has one digit).
    pub fn digits(&self) -> u32 {
        let (_, magnitude) = i256_to_sign_magnitude(self.unscaled);
        magnitude.to_string().len() as u32
    }

    /// Smallest precision able to hold this value at its own scale.
    pub fn precision(&self) -> u32 {
        self.digits().max(self.scale as u32 + 1)
    }

    /// Changes the scale; digits below the new scale are truncated toward zero.
    pub fn rescale(&self, scale: u8) -> Result<Decimal, CodecError> {
        if scale == self.scale {
            return Ok(*self);
        }
        let shift = scale.abs_diff(self.scale) as u32;
        let factor = pow10(shift).ok_or_else(|| CodecError::overflow(self, "Decimal"))?;
        let unscaled = if scale > self.scale {
            self.unscaled.checked_mul(factor)
        } else {
            self.unscaled.checked_div(factor)
        };
        unscaled
            .map(|unscaled| Decimal { unscaled, scale })
            .ok_or_else(|| CodecError::overflow(self, format!("Decimal with scale {scale}")))
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> i256 {
        match pow10(self.scale as u32).and_then(|f| self.unscaled.checked_div(f)) {
            Some(v) => v,
            None => i256::ZERO,
        }
    }

    pub fn is_integer(&self) -> bool {
        pow10(self.scale as u32)
            .and_then(|f| self.unscaled.checked_rem(f))
            .is_some_and(|r| r == i256::ZERO)
    }

    /// True when `|unscaled| < 10^precision`.
    pub fn fits_precision(&self, precision: u8) -> bool {
        let (_, magnitude) = i256_to_sign_magnitude(self.unscaled);
        match pow10(precision as u32).and_then(U256::from_i256) {
            Some(bound) => magnitude < bound,
            None => true,
        }
    }

    /// Nearest `f64`. Exact for unscaled values below 2^53 at scales up to 22.
    pub fn to_f64(&self) -> f64 {
        let (negative, magnitude) = i256_to_sign_magnitude(self.unscaled);
        let v = magnitude.to_f64() / 10f64.powi(self.scale as i32);
        if negative { -v } else { v }
    }

    /// Builds a decimal from the shortest representation that round-trips `v`.
    pub fn from_f64(v: f64) -> Result<Decimal, CodecError> {
        if !v.is_finite() {
            return Err(CodecError::invalid("Decimal", format!("{v} is not finite")));
        }
        format!("{v}").parse()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, magnitude) = i256_to_sign_magnitude(self.unscaled);
        let digits = magnitude.to_string();
        let scale = self.scale as usize;
        let sign = if negative { "-" } else { "" };
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl FromStr for Decimal {
    type Err = CodecError;

    /// Accepts `[-+]digits[.digits][e[-+]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |detail: &str| CodecError::invalid("Decimal", format!("'{s}': {detail}"));
        let text = s.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exp: i32 = body[pos + 1..]
                    .parse()
                    .map_err(|_| invalid("bad exponent"))?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };
        let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid("no digits"));
        }
        let all_digits = format!("{int_digits}{frac_digits}");
        let magnitude: U256 = all_digits
            .parse()
            .map_err(|e| match e {
                ParseWideIntError::OutOfRange => CodecError::overflow(s, "Decimal"),
                _ => invalid("bad digit"),
            })?;
        let unscaled = i256_from_sign_magnitude(negative, magnitude)
            .ok_or_else(|| CodecError::overflow(s, "Decimal"))?;

        let scale = frac_digits.len() as i64 - exponent as i64;
        if scale < 0 {
            let factor =
                pow10((-scale) as u32).ok_or_else(|| CodecError::overflow(s, "Decimal"))?;
            let unscaled = unscaled
                .checked_mul(factor)
                .ok_or_else(|| CodecError::overflow(s, "Decimal"))?;
            return Ok(Decimal::new(unscaled, 0));
        }
        let scale = u8::try_from(scale)
            .ok()
            .filter(|scale| *scale <= MAX_DECIMAL_PRECISION)
            .ok_or_else(|| CodecError::overflow(s, "Decimal"))?;
        Ok(Decimal::new(unscaled, scale))
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        Decimal::from_i128(v as i128, 0)
    }
}
