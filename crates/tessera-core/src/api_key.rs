//! API key generation.

use rand::RngCore;

/// Number of random bytes backing an API key.
const API_KEY_BYTES: usize = 32;

/// Generates a cryptographically random API key.
///
/// The key is 32 bytes from the OS CSPRNG, hex-encoded to 64 lowercase
/// characters. Keys are issued exactly once per tenant and never rotated,
/// so collision resistance is the only requirement beyond unguessability.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns `true` if `key` has the shape of a generated API key.
///
/// Used only for diagnostics; authentication never relies on key shape.
pub fn looks_like_api_key(key: &str) -> bool {
    key.len() == API_KEY_BYTES * 2 && key.bytes().all(|b| b.is_ascii_hexdigit())
}
