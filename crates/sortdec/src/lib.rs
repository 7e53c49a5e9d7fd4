//! ## Crate layout
//! - `core`: codec, decimal type, bounds, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module mirrors the surface most callers need: the decimal
//! type, the ordered codec, and its bounds.

pub use sortdec_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Codec entrypoints
//

pub use sortdec_core::{
    CodecError, CodecErrorKind, Decimal, DecimalBounds, OrderedCodec, decode, encode,
    encode_into, encoded_len,
};

/// Load codec bounds from a TOML document and build a codec for them.
pub fn codec_from_toml(input: &str) -> Result<OrderedCodec, Error> {
    let bounds = DecimalBounds::from_toml_str(input)?;

    Ok(OrderedCodec::new(bounds))
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        codec::{self, OrderedCodec},
        config::DecimalBounds,
        types::Decimal,
    };
    pub use serde::{Deserialize, Serialize};
}
