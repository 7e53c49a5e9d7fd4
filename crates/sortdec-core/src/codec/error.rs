use crate::error::InternalError;
use thiserror::Error as ThisError;

///
/// CodecError
///
/// Deterministic encode/decode failures for the ordered decimal wire form.
/// None of these are transient; retrying the same input fails the same way.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("integer too large, exceeds {max} bytes: {len} bytes")]
    MagnitudeTooLarge { len: usize, max: usize },

    #[error("invalid encoding: too short: {len} bytes (need at least {min})")]
    TooShort { len: usize, min: usize },

    #[error("invalid encoding: content length mismatch: declared {declared} bytes, {available} available")]
    LengthMismatch { declared: usize, available: usize },

    #[error("decimal out of range: {bit_len} bits (limit {max_bit_len})")]
    OutOfRange { bit_len: u64, max_bit_len: u64 },

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

impl CodecError {
    #[must_use]
    pub const fn kind(&self) -> CodecErrorKind {
        match self {
            Self::MagnitudeTooLarge { .. } => CodecErrorKind::MagnitudeTooLarge,
            Self::TooShort { .. } => CodecErrorKind::TooShort,
            Self::LengthMismatch { .. } => CodecErrorKind::LengthMismatch,
            Self::OutOfRange { .. } => CodecErrorKind::OutOfRange,
            Self::BufferTooSmall { .. } => CodecErrorKind::BufferTooSmall,
        }
    }
}

impl From<CodecError> for InternalError {
    fn from(err: CodecError) -> Self {
        match err.kind() {
            CodecErrorKind::TooShort
            | CodecErrorKind::LengthMismatch
            | CodecErrorKind::OutOfRange => Self::codec_corruption(err.to_string()),
            CodecErrorKind::MagnitudeTooLarge => Self::codec_unsupported(err.to_string()),
            CodecErrorKind::BufferTooSmall => Self::codec_internal(err.to_string()),
        }
    }
}

///
/// CodecErrorKind
///
/// Fieldless discriminant of [`CodecError`], used for metrics and matching.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CodecErrorKind {
    MagnitudeTooLarge,
    TooShort,
    LengthMismatch,
    OutOfRange,
    BufferTooSmall,
}

impl CodecErrorKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MagnitudeTooLarge => "magnitude_too_large",
            Self::TooShort => "too_short",
            Self::LengthMismatch => "length_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::BufferTooSmall => "buffer_too_small",
        }
    }
}
