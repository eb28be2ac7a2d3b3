use sealkit_codec::kdf::MIN_ITERATIONS;
use sealkit_codec::prelude::*;

pub const PASSWORD: &[u8] = b"testpass";

/// Initializes a codec with the minimum iteration count to keep tests fast.
/// # Panics
/// * If codec setup fails, the function will panic.
#[must_use]
pub fn setup_codec() -> Codec {
    Codec::builder().iterations(MIN_ITERATIONS).build().expect("Codec setup failed")
}

/// Returns a fast config for the given cipher.
#[must_use]
pub fn fast_config(algorithm: Algorithm, key_length_bits: u32) -> CodecConfig {
    CodecConfig { iterations: MIN_ITERATIONS, key_length_bits, algorithm }
}
