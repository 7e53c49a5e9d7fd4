//! Module: config
//! Responsibility: magnitude bounds for the decimal codec.
//! Does not own: the range predicate itself (see `Decimal::is_in_valid_range_with`).
//! Boundary: deserialized from TOML or built in code, validated before use.

use crate::error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Integer bits above the fixed-point scale: values up to `2^512 * 10^18`.
pub const DEFAULT_INTEGER_BITS: u64 = 512;

/// Bits consumed by the `10^18` fixed-point scale (`ceil(log2(10^18))`).
pub const PRECISION_BITS: u64 = 60;

pub const DEFAULT_MAX_BIT_LEN: u64 = DEFAULT_INTEGER_BITS + PRECISION_BITS;

/// The wire length byte caps magnitudes at 255 bytes.
pub const MAX_SUPPORTED_BIT_LEN: u64 = 255 * 8;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid bounds config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("max_bit_len must be in 1..={max}, got {got}")]
    MaxBitLen { got: u64, max: u64 },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::config_unsupported(err.to_string())
    }
}

///
/// DecimalBounds
///
/// Magnitude limit enforced by the codec.
///
/// Invariant:
/// - a raw integer is in range iff its magnitude bit length <= `max_bit_len`
/// - `max_bit_len` never exceeds what the one-byte length header can carry
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecimalBounds {
    pub max_bit_len: u64,
    pub reject_out_of_range_on_encode: bool,
}

impl DecimalBounds {
    pub const DEFAULT: Self = Self {
        max_bit_len: DEFAULT_MAX_BIT_LEN,
        reject_out_of_range_on_encode: false,
    };

    #[must_use]
    pub const fn with_max_bit_len(mut self, max_bit_len: u64) -> Self {
        self.max_bit_len = max_bit_len;
        self
    }

    #[must_use]
    pub const fn with_encode_range_check(mut self, enabled: bool) -> Self {
        self.reject_out_of_range_on_encode = enabled;
        self
    }

    /// Parse and validate bounds from a TOML document.
    ///
    /// Missing keys fall back to [`DecimalBounds::DEFAULT`]; unknown keys are rejected.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let bounds: Self = toml::from_str(input)?;
        bounds.validate()?;

        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bit_len == 0 || self.max_bit_len > MAX_SUPPORTED_BIT_LEN {
            return Err(ConfigError::MaxBitLen {
                got: self.max_bit_len,
                max: MAX_SUPPORTED_BIT_LEN,
            });
        }

        Ok(())
    }

    /// Whether a magnitude of `bit_len` bits is inside the configured bound.
    #[must_use]
    pub const fn allows_bit_len(&self, bit_len: u64) -> bool {
        bit_len <= self.max_bit_len
    }
}

impl Default for DecimalBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

///
/// TESTS
///
