//! ## Crate layout
//! - `codec`: order-preserving binary encoding (sign | length | content).
//! - `config`: magnitude bounds loaded from defaults or TOML.
//! - `error`: structured runtime error with class + origin taxonomy.
//! - `obs`: codec metrics events and sink plumbing.
//! - `types`: the arbitrary-precision fixed-point `Decimal`.

pub mod codec;
pub mod config;
pub mod error;
pub mod obs;
pub mod types;

// re-exports
pub use codec::{CodecError, CodecErrorKind, OrderedCodec, decode, encode, encode_into, encoded_len};
pub use config::{ConfigError, DecimalBounds};
pub use error::InternalError;
pub use types::{Decimal, DecimalError};
