use crate::{
    codec::{self, CodecError},
    config::DecimalBounds,
    error::InternalError,
};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use serde_bytes::{ByteBuf, Bytes};
use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Neg, Sub},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// `10^PRECISION`; fits in a `u64`.
const PRECISION_MULTIPLIER: u64 = 1_000_000_000_000_000_000;

///
/// DecimalError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecimalError {
    #[error("decimal string cannot be empty")]
    Empty,

    #[error("invalid character '{ch}' in decimal string")]
    InvalidCharacter { ch: char },

    #[error("invalid decimal string: more than one '.'")]
    MultipleDecimalPoints,

    #[error("fractional part has {got} digits, at most {max} allowed")]
    TooManyFractionalDigits { got: usize, max: u32 },

    #[error("precision {prec} exceeds max precision {max}")]
    PrecisionTooLarge { prec: u32, max: u32 },

    #[error("decimal out of range: {bit_len} bits (limit {max_bit_len})")]
    OutOfRange { bit_len: u64, max_bit_len: u64 },
}

impl From<DecimalError> for InternalError {
    fn from(err: DecimalError) -> Self {
        Self::parse_unsupported(err.to_string())
    }
}

///
/// Decimal
///
/// Signed arbitrary-precision fixed-point number: `raw * 10^-PRECISION`.
///
/// Invariant:
/// - an absent raw integer is numeric zero for equality, ordering, and hashing
/// - the raw integer is never rescaled; all precisions share one scale
///

#[derive(Clone, Debug, Default)]
pub struct Decimal(Option<BigInt>);

impl Decimal {
    pub const PRECISION: u32 = 18;

    ///
    /// CONSTRUCTORS
    ///

    /// A decimal with no underlying integer.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn zero() -> Self {
        Self(Some(BigInt::zero()))
    }

    #[must_use]
    pub fn one() -> Self {
        Self(Some(BigInt::from(PRECISION_MULTIPLIER)))
    }

    /// The smallest positive value, `10^-PRECISION`.
    #[must_use]
    pub fn smallest() -> Self {
        Self(Some(BigInt::from(1u8)))
    }

    /// Build from an integer value (no fractional part).
    #[must_use]
    pub fn new(int: i64) -> Self {
        Self(Some(BigInt::from(int) * PRECISION_MULTIPLIER))
    }

    /// Build `int * 10^-prec`, e.g. `new_with_prec(150, 2)` is `1.50`.
    pub fn new_with_prec(int: i64, prec: u32) -> Result<Self, DecimalError> {
        Self::from_big_int_with_prec(BigInt::from(int), prec)
    }

    pub fn from_big_int_with_prec(int: BigInt, prec: u32) -> Result<Self, DecimalError> {
        let shift = Self::PRECISION
            .checked_sub(prec)
            .ok_or(DecimalError::PrecisionTooLarge {
                prec,
                max: Self::PRECISION,
            })?;

        Ok(Self(Some(int * BigInt::from(10u8).pow(shift))))
    }

    /// Wrap an already-scaled raw integer.
    #[must_use]
    pub const fn from_raw(raw: BigInt) -> Self {
        Self(Some(raw))
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub const fn as_big_int(&self) -> Option<&BigInt> {
        self.0.as_ref()
    }

    /// The raw integer, with absent mapped to zero.
    #[must_use]
    pub fn raw(&self) -> Cow<'_, BigInt> {
        match &self.0 {
            Some(raw) => Cow::Borrowed(raw),
            None => Cow::Owned(BigInt::zero()),
        }
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.as_ref().is_none_or(Zero::is_zero)
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.as_ref().is_some_and(Signed::is_negative)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.as_ref().is_some_and(Signed::is_positive)
    }

    /// Bit length of the raw magnitude; zero for zero and absent.
    #[must_use]
    pub fn bit_len(&self) -> u64 {
        self.0.as_ref().map_or(0, BigInt::bits)
    }

    /// Range check against the default bounds.
    #[must_use]
    pub fn is_in_valid_range(&self) -> bool {
        self.is_in_valid_range_with(&DecimalBounds::DEFAULT)
    }

    #[must_use]
    pub fn is_in_valid_range_with(&self, bounds: &DecimalBounds) -> bool {
        bounds.allows_bit_len(self.bit_len())
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.as_ref().map(Signed::abs))
    }

    ///
    /// ORDERED BYTES
    ///

    pub fn to_ordered_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    /// Encode into `buf`; size it with [`codec::encoded_len`].
    pub fn marshal_to(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        codec::encode_into(self, buf)
    }

    pub fn from_ordered_bytes(data: &[u8]) -> Result<Self, CodecError> {
        codec::decode(data)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw().cmp(&other.raw())
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.map(Neg::neg))
    }
}

impl Add for Decimal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(Some(self.0.unwrap_or_default() + rhs.0.unwrap_or_default()))
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(Some(self.0.unwrap_or_default() - rhs.0.unwrap_or_default()))
    }
}

// Text form: `[-]<int>.<18 fractional digits>`, e.g. `-1.500000000000000000`.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.raw();
        let digits = raw.magnitude().to_str_radix(10);
        let precision = Self::PRECISION as usize;

        if raw.is_negative() {
            f.write_str("-")?;
        }

        if digits.len() > precision {
            let (int, frac) = digits.split_at(digits.len() - precision);
            write!(f, "{int}.{frac}")
        } else {
            write!(f, "0.{digits:0>precision$}")
        }
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(DecimalError::Empty);
        }
        if frac.contains('.') {
            return Err(DecimalError::MultipleDecimalPoints);
        }
        if let Some(ch) = int.chars().chain(frac.chars()).find(|ch| !ch.is_ascii_digit()) {
            return Err(DecimalError::InvalidCharacter { ch });
        }
        if frac.len() > Self::PRECISION as usize {
            return Err(DecimalError::TooManyFractionalDigits {
                got: frac.len(),
                max: Self::PRECISION,
            });
        }

        let mut combined = String::with_capacity(int.len() + Self::PRECISION as usize);
        combined.push_str(int);
        combined.push_str(frac);
        combined.extend(std::iter::repeat_n('0', Self::PRECISION as usize - frac.len()));

        let mut raw = BigInt::parse_bytes(combined.as_bytes(), 10).ok_or(DecimalError::Empty)?;
        if negative {
            raw = -raw;
        }

        let value = Self(Some(raw));
        if !value.is_in_valid_range() {
            return Err(DecimalError::OutOfRange {
                bit_len: value.bit_len(),
                max_bit_len: DecimalBounds::DEFAULT.max_bit_len,
            });
        }

        Ok(value)
    }
}

// Serde:
// - Human-readable formats (e.g. JSON) use the decimal text string.
// - Non-human-readable formats carry the order-preserving codec bytes.
impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            return serializer.collect_str(self);
        }

        let encoded = self.to_ordered_bytes().map_err(serde::ser::Error::custom)?;
        Bytes::new(&encoded).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalPayload {
            Binary(ByteBuf),
            Text(String),
        }

        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            return s.parse().map_err(serde::de::Error::custom);
        }

        match DecimalPayload::deserialize(deserializer)? {
            DecimalPayload::Binary(bytes) => {
                Self::from_ordered_bytes(&bytes).map_err(serde::de::Error::custom)
            }
            DecimalPayload::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

///
/// TESTS
///
