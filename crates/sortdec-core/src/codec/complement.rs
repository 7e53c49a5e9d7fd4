//! Module: codec::complement
//! Responsibility: base-255 complement transforms that flip ascending byte order.
//! Does not own: sign dispatch or framing.
//! Boundary: shared by encode and decode so both directions stay symmetric.

/// Complement one length header byte (`255 - len`).
pub(super) const fn complement_len(len: u8) -> u8 {
    u8::MAX - len
}

/// Complement every byte in place (`255 - b`).
pub(super) fn complement_in_place(bytes: &mut [u8]) {
    for byte in bytes {
        *byte = u8::MAX - *byte;
    }
}

/// Return a complemented copy of `bytes`.
pub(super) fn complement_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&byte| u8::MAX - byte).collect()
}

///
/// TESTS
///
