use serde::{Deserialize, Serialize};
use sortdec_core::{
    codec::{CodecError, CodecErrorKind},
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    types::DecimalError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Corruption => ErrorKind::Corruption,
            ErrorClass::Unsupported => ErrorKind::Unsupported,
            ErrorClass::Internal => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        let kind = err.kind();
        let mut mapped = Self::from(InternalError::from(err));
        mapped.kind = ErrorKind::Codec(kind.into());

        mapped
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<DecimalError> for Error {
    fn from(err: DecimalError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Codec(CodecFailure),

    /// Persisted bytes are malformed.
    Corruption,

    /// The input is well-formed but not supported.
    Unsupported,

    /// The caller cannot remediate this.
    Internal,
}

///
/// CodecFailure
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CodecFailure {
    MagnitudeTooLarge,
    TooShort,
    LengthMismatch,
    OutOfRange,
    BufferTooSmall,
}

impl From<CodecErrorKind> for CodecFailure {
    fn from(kind: CodecErrorKind) -> Self {
        match kind {
            CodecErrorKind::MagnitudeTooLarge => Self::MagnitudeTooLarge,
            CodecErrorKind::TooShort => Self::TooShort,
            CodecErrorKind::LengthMismatch => Self::LengthMismatch,
            CodecErrorKind::OutOfRange => Self::OutOfRange,
            CodecErrorKind::BufferTooSmall => Self::BufferTooSmall,
        }
    }
}

impl fmt::Display for CodecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::MagnitudeTooLarge => CodecErrorKind::MagnitudeTooLarge,
            Self::TooShort => CodecErrorKind::TooShort,
            Self::LengthMismatch => CodecErrorKind::LengthMismatch,
            Self::OutOfRange => CodecErrorKind::OutOfRange,
            Self::BufferTooSmall => CodecErrorKind::BufferTooSmall,
        };
        f.write_str(kind.label())
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Parse,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Codec => Self::Codec,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Parse => Self::Parse,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_maps_to_codec_kind() {
        let err = Error::from(CodecError::TooShort { len: 1, min: 2 });

        assert_eq!(err.kind, ErrorKind::Codec(CodecFailure::TooShort));
        assert_eq!(err.origin, ErrorOrigin::Codec);
        assert!(err.message.starts_with("invalid encoding: too short"));
    }

    #[test]
    fn codec_failure_displays_stable_label() {
        assert_eq!(CodecFailure::OutOfRange.to_string(), "out_of_range");
        assert_eq!(CodecFailure::BufferTooSmall.to_string(), "buffer_too_small");
    }

    #[test]
    fn parse_error_maps_to_unsupported_parse() {
        let err = Error::from(DecimalError::Empty);

        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.origin, ErrorOrigin::Parse);
    }

    #[test]
    fn config_error_maps_to_config_origin() {
        let err = Error::from(ConfigError::MaxBitLen { got: 0, max: 2040 });

        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn error_serializes_for_callers() {
        let err = Error::from(CodecError::BufferTooSmall {
            needed: 4,
            available: 2,
        });
        let json = serde_json::to_string(&err).expect("serialize error");
        let back: Error = serde_json::from_str(&json).expect("deserialize error");

        assert_eq!(back, err);
    }
}
