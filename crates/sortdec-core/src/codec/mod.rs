//! Module: codec
//! Responsibility: order-preserving binary encoding for `Decimal` raw integers.
//! Does not own: decimal arithmetic, text formatting, or range policy constants.
//! Boundary: the only producer and consumer of the `sign | length | content` wire form.
//!
//! Wire form, total `2 + len` bytes:
//!
//! | value    | sign   | length      | content              |
//! |----------|--------|-------------|----------------------|
//! | negative | `0x00` | `255 - len` | `255 - b` per byte   |
//! | zero     | `0x01` | `0`         | (none)               |
//! | positive | `0x01` | `len`       | magnitude bytes      |
//!
//! `len` is the minimal big-endian byte length of the magnitude. Lexicographic
//! order of encodings equals numeric order because the sign byte dominates,
//! the length byte orders magnitudes of different width, and the complement
//! flips both of those comparisons for negatives.

mod complement;
mod error;


pub use error::{CodecError, CodecErrorKind};

use crate::{
    config::DecimalBounds,
    obs::sink::{self, MetricsEvent},
    types::Decimal,
};
use complement::{complement_bytes, complement_in_place, complement_len};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

pub const NEGATIVE_SIGN: u8 = 0x00;
pub const NON_NEGATIVE_SIGN: u8 = 0x01;
pub const HEADER_LEN: usize = 2;
pub const MAX_MAGNITUDE_LEN: usize = u8::MAX as usize;
pub const MAX_ENCODED_LEN: usize = HEADER_LEN + MAX_MAGNITUDE_LEN;

///
/// OrderedCodec
///
/// Order-preserving decimal codec bound to one magnitude limit.
/// Stateless apart from its bounds; safe to share across threads.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OrderedCodec {
    bounds: DecimalBounds,
}

impl OrderedCodec {
    #[must_use]
    pub const fn new(bounds: DecimalBounds) -> Self {
        Self { bounds }
    }

    #[must_use]
    pub const fn bounds(&self) -> &DecimalBounds {
        &self.bounds
    }

    /// Encode one decimal into a freshly allocated buffer.
    pub fn encode(&self, value: &Decimal) -> Result<Vec<u8>, CodecError> {
        let result = self.magnitude(value).map(|magnitude| {
            let mut out = vec![0u8; magnitude.encoded_len()];
            magnitude.write(&mut out);
            out
        });
        observe_encode(result.as_ref().map(Vec::len));

        result
    }

    /// Encode into `buf`, returning the number of bytes written.
    ///
    /// Nothing is written when the buffer is too small.
    pub fn encode_into(&self, value: &Decimal, buf: &mut [u8]) -> Result<usize, CodecError> {
        let result = self.magnitude(value).and_then(|magnitude| {
            let needed = magnitude.encoded_len();
            let available = buf.len();
            let out = buf
                .get_mut(..needed)
                .ok_or(CodecError::BufferTooSmall { needed, available })?;
            magnitude.write(out);

            Ok(needed)
        });
        observe_encode(result.as_ref().copied());

        result
    }

    /// Number of bytes `encode` would produce, without building them.
    pub fn encoded_len(&self, value: &Decimal) -> Result<usize, CodecError> {
        let bit_len = value.bit_len();
        let len = usize::try_from(bit_len.div_ceil(8)).unwrap_or(usize::MAX);
        check_magnitude_len(len)?;
        if self.bounds.reject_out_of_range_on_encode {
            self.check_range(value)?;
        }

        Ok(HEADER_LEN + len)
    }

    /// Decode one encoding back into a decimal.
    ///
    /// Empty input decodes to the absent decimal; bytes after the declared
    /// content are ignored.
    pub fn decode(&self, data: &[u8]) -> Result<Decimal, CodecError> {
        let result = self.decode_unobserved(data);
        match &result {
            Ok(_) => sink::record(MetricsEvent::Decode {
                bytes: data.len(),
                absent: data.is_empty(),
            }),
            Err(err) => sink::record(MetricsEvent::DecodeRejected { kind: err.kind() }),
        }

        result
    }

    fn decode_unobserved(&self, data: &[u8]) -> Result<Decimal, CodecError> {
        if data.is_empty() {
            return Ok(Decimal::absent());
        }

        let [sign_byte, len_byte, rest @ ..] = data else {
            return Err(CodecError::TooShort {
                len: data.len(),
                min: HEADER_LEN,
            });
        };

        let negative = *sign_byte == NEGATIVE_SIGN;
        let declared = usize::from(if negative {
            complement_len(*len_byte)
        } else {
            *len_byte
        });
        let content = rest.get(..declared).ok_or(CodecError::LengthMismatch {
            declared,
            available: rest.len(),
        })?;

        let value = if negative {
            let magnitude = BigUint::from_bytes_be(&complement_bytes(content));
            Decimal::from_raw(BigInt::from_biguint(Sign::Minus, magnitude))
        } else {
            Decimal::from_raw(BigInt::from_biguint(
                Sign::Plus,
                BigUint::from_bytes_be(content),
            ))
        };
        self.check_range(&value)?;

        Ok(value)
    }

    fn magnitude(&self, value: &Decimal) -> Result<Magnitude, CodecError> {
        let magnitude = Magnitude::of(value)?;
        if self.bounds.reject_out_of_range_on_encode {
            self.check_range(value)?;
        }

        Ok(magnitude)
    }

    fn check_range(&self, value: &Decimal) -> Result<(), CodecError> {
        if value.is_in_valid_range_with(&self.bounds) {
            return Ok(());
        }

        Err(CodecError::OutOfRange {
            bit_len: value.bit_len(),
            max_bit_len: self.bounds.max_bit_len,
        })
    }
}

///
/// Magnitude
///
/// Sign plus minimal big-endian magnitude bytes, length already checked
/// against the one-byte header.
///

struct Magnitude {
    negative: bool,
    len: u8,
    bytes: Vec<u8>,
}

impl Magnitude {
    fn of(value: &Decimal) -> Result<Self, CodecError> {
        let Some(raw) = value.as_big_int() else {
            return Ok(Self {
                negative: false,
                len: 0,
                bytes: Vec::new(),
            });
        };

        let bytes = magnitude_bytes(raw.magnitude());
        let len = check_magnitude_len(bytes.len())?;

        Ok(Self {
            negative: raw.sign() == Sign::Minus,
            len,
            bytes,
        })
    }

    fn encoded_len(&self) -> usize {
        HEADER_LEN + self.bytes.len()
    }

    // `out` must be exactly `encoded_len()` bytes.
    fn write(&self, out: &mut [u8]) {
        let (header, content) = out.split_at_mut(HEADER_LEN);
        content.copy_from_slice(&self.bytes);

        if self.negative {
            header[0] = NEGATIVE_SIGN;
            header[1] = complement_len(self.len);
            complement_in_place(content);
        } else {
            header[0] = NON_NEGATIVE_SIGN;
            header[1] = self.len;
        }
    }
}

/// Minimal big-endian bytes of `magnitude`; empty for zero, never a leading zero byte.
fn magnitude_bytes(magnitude: &BigUint) -> Vec<u8> {
    if magnitude.is_zero() {
        return Vec::new();
    }

    let bytes = magnitude.to_bytes_be();
    debug_assert_ne!(bytes.first(), Some(&0), "magnitude bytes must be minimal");

    bytes
}

fn check_magnitude_len(len: usize) -> Result<u8, CodecError> {
    u8::try_from(len).map_err(|_| CodecError::MagnitudeTooLarge {
        len,
        max: MAX_MAGNITUDE_LEN,
    })
}

fn observe_encode(result: Result<usize, &CodecError>) {
    match result {
        Ok(bytes) => sink::record(MetricsEvent::Encode { bytes }),
        Err(err) => sink::record(MetricsEvent::EncodeRejected { kind: err.kind() }),
    }
}

/// Encode with the default bounds.
pub fn encode(value: &Decimal) -> Result<Vec<u8>, CodecError> {
    OrderedCodec::default().encode(value)
}

/// Encode into a caller buffer with the default bounds.
pub fn encode_into(value: &Decimal, buf: &mut [u8]) -> Result<usize, CodecError> {
    OrderedCodec::default().encode_into(value, buf)
}

/// Encoded length under the default bounds.
pub fn encoded_len(value: &Decimal) -> Result<usize, CodecError> {
    OrderedCodec::default().encoded_len(value)
}

/// Decode with the default bounds.
pub fn decode(data: &[u8]) -> Result<Decimal, CodecError> {
    OrderedCodec::default().decode(data)
}
