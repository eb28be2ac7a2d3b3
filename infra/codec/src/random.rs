//! # Random Sources
//!
//! Salts and nonces are drawn from a [`RandomSource`]. The codec shares one source
//! across threads and relies on the provider for thread safety.

use crate::error::{CodecError, Result};

/// A cryptographically secure source of random bytes.
pub trait RandomSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    /// Returns [`CodecError::Encryption`] if the source is unavailable.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG, accessed through `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    #[inline]
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        getrandom::fill(dest).map_err(|e| CodecError::Encryption {
            message: "System RNG unavailable".into(),
            context: Some(format!("getrandom: {e}").into()),
        })
    }
}
