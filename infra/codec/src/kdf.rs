//! # Key Derivation
//!
//! Password-based key derivation with PBKDF2-HMAC-SHA256.
//!
//! The derivation is deterministic: the same password, salt, iteration count and key
//! length always yield the same key, which is what lets [`crate::decrypt`] rebuild the
//! key from the salt stored in a container.

use crate::container::SALT_LEN;
use crate::error::{CodecError, Result};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_ITERATIONS: u32 = 10_000;

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Key length used when none is configured.
pub const DEFAULT_KEY_LENGTH_BITS: u32 = 256;

const MAX_KEY_LEN: usize = 32;

/// Ephemeral symmetric key material.
///
/// Owned by a single encrypt or decrypt call and wiped when dropped,
/// on success and failure paths alike.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; MAX_KEY_LEN],
    len: usize,
}

impl DerivedKey {
    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").field("len", &self.len).finish_non_exhaustive()
    }
}

/// Converts a key length in bits into bytes, accepting only 128 and 256.
pub(crate) fn key_len_bytes(key_length_bits: u32) -> Result<usize> {
    match key_length_bits {
        128 => Ok(16),
        256 => Ok(32),
        other => Err(CodecError::Configuration {
            message: "Key length must be 128 or 256 bits".into(),
            context: Some(format!("key_length_bits={other}").into()),
        }),
    }
}

pub(crate) fn check_iterations(iterations: u32) -> Result<()> {
    if iterations < MIN_ITERATIONS {
        return Err(CodecError::Configuration {
            message: format!("Iteration count must be at least {MIN_ITERATIONS}").into(),
            context: Some(format!("iterations={iterations}").into()),
        });
    }
    Ok(())
}

pub(crate) fn check_password(password: &[u8]) -> Result<()> {
    if password.is_empty() {
        return Err(CodecError::configuration("Password must not be empty"));
    }
    Ok(())
}

/// Derives a symmetric key from a password using PBKDF2-HMAC-SHA256.
///
/// # Arguments
/// * `password`: Caller-supplied secret. Never logged.
/// * `salt`: At least 16 random bytes.
/// * `iterations`: At least [`MIN_ITERATIONS`]; [`DEFAULT_ITERATIONS`] is recommended.
/// * `key_length_bits`: `128` or `256`.
///
/// # Password Equivalence
/// HMAC pads keys shorter than the SHA-256 block (64 bytes) with zeros, so a password and
/// the same password followed by NUL bytes derive the same key. Callers that accept
/// arbitrary binary passwords and need them distinct must encode them first, e.g. by
/// length-prefixing.
///
/// # Errors
/// Returns [`CodecError::Configuration`] if the password is empty, the salt is shorter
/// than 16 bytes, the iteration count is below the minimum, or the key length is
/// unsupported.
pub fn derive_key(
    password: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    iterations: u32,
    key_length_bits: u32,
) -> Result<DerivedKey> {
    let password = password.as_ref();
    let salt = salt.as_ref();

    check_password(password)?;
    check_iterations(iterations)?;
    let len = key_len_bytes(key_length_bits)?;

    if salt.len() < SALT_LEN {
        return Err(CodecError::Configuration {
            message: format!("Salt must be at least {SALT_LEN} bytes").into(),
            context: Some(format!("salt_len={}", salt.len()).into()),
        });
    }

    Ok(pbkdf2_sha256(password, salt, iterations, len))
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32, len: usize) -> DerivedKey {
    let mut key = DerivedKey { bytes: [0u8; MAX_KEY_LEN], len };
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key.bytes[..len]);
    key
}
