//! A 256-bit signed integer stored as a two's-complement [`U256`].

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use std::{cmp, fmt, ops, str::FromStr};
use thiserror::Error;

/// The error type returned when conversion to or from a 256-bit integer fails.
#[derive(Clone, Copy, Debug, Error)]
#[error("out of range integer conversion attempted")]
pub struct TryFromBigIntError;

/// The error type returned when parsing a 256-bit signed integer.
#[derive(Clone, Copy, Debug, Error)]
pub enum ParseI256Error {
    /// An invalid digit was encountered while parsing.
    #[error("invalid digit found in string")]
    InvalidDigit,

    /// The number is too large or too small (negative) and does not fit in a
    /// 256-bit signed integer.
    #[error("number does not fit in 256-bit integer")]
    IntegerOverflow,
}

/// The sign of a 256-bit signed integer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sign {
    /// Greater than or equal to zero.
    Positive,
    /// Less than zero.
    Negative,
}

impl Sign {
    /// Returns whether the sign is positive.
    #[inline(always)]
    pub const fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }

    /// Returns whether the sign is negative.
    #[inline(always)]
    pub const fn is_negative(&self) -> bool {
        matches!(self, Self::Negative)
    }
}

/// Little-endian 256-bit signed integer.
///
/// Stored as the two's complement of its absolute value, so conversion to and
/// from the raw [`U256`] word used on the ABI wire is free.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct I256(U256);

/// Compute the two's complement of a U256.
pub(crate) fn twos_complement(abs: U256) -> U256 {
    let (value, _) = (!abs).overflowing_add(U256::one());
    value
}

impl I256 {
    /// Maximum value.
    pub const MAX: Self = Self(U256([u64::MAX, u64::MAX, u64::MAX, i64::MAX as _]));

    /// Minimum value.
    pub const MIN: Self = Self(U256([0, 0, 0, i64::MIN as _]));

    /// Zero (additive identity) of this type.
    #[inline(always)]
    pub const fn zero() -> Self {
        Self(U256::zero())
    }

    /// One (multiplicative identity) of this type.
    #[inline(always)]
    pub const fn one() -> Self {
        Self(U256::one())
    }

    /// Minus one.
    #[inline(always)]
    pub const fn minus_one() -> Self {
        Self(U256::MAX)
    }

    /// Creates an I256 from a sign and an absolute value. Returns the value
    /// and a bool that is true if the conversion caused an overflow.
    #[inline(always)]
    pub fn overflowing_from_sign_and_abs(sign: Sign, abs: U256) -> (Self, bool) {
        let value = Self(match sign {
            Sign::Positive => abs,
            Sign::Negative => twos_complement(abs),
        });
        let overflow = match sign {
            Sign::Positive => value.sign().is_negative(),
            Sign::Negative => !abs.is_zero() && value.sign().is_positive(),
        };
        (value, overflow)
    }

    /// Creates an I256 from an absolute value and a sign. Returns `None` if it
    /// would overflow.
    #[inline(always)]
    pub fn checked_from_sign_and_abs(sign: Sign, abs: U256) -> Option<Self> {
        let (result, overflow) = Self::overflowing_from_sign_and_abs(sign, abs);
        if overflow {
            None
        } else {
            Some(result)
        }
    }

    /// Splits an I256 into its sign and absolute value.
    #[inline(always)]
    pub fn into_sign_and_abs(self) -> (Sign, U256) {
        let sign = self.sign();
        let abs = match sign {
            Sign::Positive => self.0,
            Sign::Negative => twos_complement(self.0),
        };
        (sign, abs)
    }

    /// Returns the sign of self.
    #[inline(always)]
    pub const fn sign(self) -> Sign {
        let most_significant_word = (self.0).0[3];
        match most_significant_word & (1 << 63) {
            0 => Sign::Positive,
            _ => Sign::Negative,
        }
    }

    /// Returns `true` if self is zero.
    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if self is negative.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.sign().is_negative()
    }

    /// Coerces an unsigned integer into a signed one. Values greater than or
    /// equal to `1 << 255` wrap around into negative values.
    #[inline(always)]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the raw two's-complement word backing this integer.
    #[inline(always)]
    pub const fn into_raw(self) -> U256 {
        self.0
    }

    /// Convert from a decimal string, with an optional leading `+` or `-`.
    pub fn from_dec_str(value: &str) -> Result<Self, ParseI256Error> {
        let (sign, value) = match value.as_bytes().first() {
            Some(b'+') => (Sign::Positive, &value[1..]),
            Some(b'-') => (Sign::Negative, &value[1..]),
            _ => (Sign::Positive, value),
        };
        let abs = U256::from_dec_str(value).map_err(|_| ParseI256Error::InvalidDigit)?;
        Self::checked_from_sign_and_abs(sign, abs).ok_or(ParseI256Error::IntegerOverflow)
    }

    /// Convert from a hexadecimal string, with an optional leading `-` and an
    /// optional `0x` prefix.
    pub fn from_hex_str(value: &str) -> Result<Self, ParseI256Error> {
        let (sign, value) = match value.as_bytes().first() {
            Some(b'-') => (Sign::Negative, &value[1..]),
            _ => (Sign::Positive, value),
        };
        let value = value.strip_prefix("0x").unwrap_or(value);
        if value.is_empty() || value.len() > 64 {
            return Err(ParseI256Error::IntegerOverflow)
        }
        let mut padded = String::with_capacity(64);
        if value.len() % 2 != 0 {
            padded.push('0');
        }
        padded.push_str(value);
        let bytes = hex::decode(&padded).map_err(|_| ParseI256Error::InvalidDigit)?;
        let abs = U256::from_big_endian(&bytes);
        Self::checked_from_sign_and_abs(sign, abs).ok_or(ParseI256Error::IntegerOverflow)
    }

    /// Low 64 bits of the two's-complement representation.
    #[inline(always)]
    pub fn low_u64(self) -> u64 {
        self.0.low_u64()
    }

    /// Checked conversion to `i64`.
    pub fn to_i64(self) -> Result<i64, TryFromBigIntError> {
        let (sign, abs) = self.into_sign_and_abs();
        match sign {
            Sign::Positive if abs <= U256::from(i64::MAX as u64) => Ok(abs.low_u64() as i64),
            Sign::Negative if abs <= U256::from(i64::MAX as u64 + 1) => {
                Ok((abs.low_u64() as i64).wrapping_neg())
            }
            _ => Err(TryFromBigIntError),
        }
    }

    /// Checked conversion to `u64`.
    pub fn to_u64(self) -> Result<u64, TryFromBigIntError> {
        let (sign, abs) = self.into_sign_and_abs();
        if sign.is_negative() || abs > U256::from(u64::MAX) {
            return Err(TryFromBigIntError)
        }
        Ok(abs.low_u64())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for I256 {
                fn from(value: $t) -> Self {
                    let value = value as i128;
                    if value < 0 {
                        // unsigned cast sign-extends, complete the extension
                        // across the remaining high words
                        Self(U256::from(value as u128) | U256([0, 0, u64::MAX, u64::MAX]))
                    } else {
                        Self(U256::from(value as u128))
                    }
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for I256 {
                fn from(value: $t) -> Self {
                    Self(U256::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, i128);
impl_from_unsigned!(u8, u16, u32, u64, u128);

impl TryFrom<U256> for I256 {
    type Error = TryFromBigIntError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        let result = Self(value);
        if result.sign().is_negative() {
            Err(TryFromBigIntError)
        } else {
            Ok(result)
        }
    }
}

impl TryFrom<I256> for U256 {
    type Error = TryFromBigIntError;

    fn try_from(value: I256) -> Result<Self, Self::Error> {
        if value.sign().is_negative() {
            Err(TryFromBigIntError)
        } else {
            Ok(value.0)
        }
    }
}

impl FromStr for I256 {
    type Err = ParseI256Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(value)
    }
}

impl ops::Neg for I256 {
    type Output = I256;

    fn neg(self) -> Self::Output {
        Self(twos_complement(self.0))
    }
}

impl cmp::PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl cmp::Ord for I256 {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self.sign(), other.sign()) {
            (Sign::Positive, Sign::Negative) => cmp::Ordering::Greater,
            (Sign::Negative, Sign::Positive) => cmp::Ordering::Less,
            _ => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, abs) = self.into_sign_and_abs();
        if sign.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{abs}")
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::LowerHex for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
