//! # AEAD Ciphers
//!
//! Thin dispatch over the `aead` cipher implementations. Only authenticated modes are
//! reachable from here: AES-GCM (128 or 256-bit keys) and ChaCha20-Poly1305 (256-bit keys).
//! The 16-byte tag is appended to the ciphertext.

use crate::container::{NONCE_LEN, TAG_LEN};
use crate::error::{CodecError, Result};
use crate::kdf::DerivedKey;
use aead::inout::InOutBuf;
use aead::{AeadInOut, KeyInit, Nonce, Tag};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub(crate) trait SealCipher: AeadInOut + KeyInit + 'static {}
impl<T: AeadInOut + KeyInit + 'static> SealCipher for T {}

/// The authenticated cipher used to seal container payloads.
///
/// The algorithm is not recorded in the container, so the same choice must be
/// configured on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// AES in Galois/Counter Mode, with a 128 or 256-bit key.
    #[default]
    #[serde(rename = "aes-gcm")]
    AesGcm,
    /// ChaCha20-Poly1305, 256-bit key only.
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl Algorithm {
    /// Returns the canonical lowercase name, as accepted in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AesGcm => "aes-gcm",
            Self::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    /// Returns `true` if the cipher accepts keys of `key_length_bits`.
    #[must_use]
    pub const fn supports_key_length(self, key_length_bits: u32) -> bool {
        match self {
            Self::AesGcm => matches!(key_length_bits, 128 | 256),
            Self::ChaCha20Poly1305 => key_length_bits == 256,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encrypts `plaintext` and returns `ciphertext || tag`.
pub(crate) fn seal(
    algorithm: Algorithm,
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    match (algorithm, key.len()) {
        (Algorithm::AesGcm, 16) => seal_with::<Aes128Gcm>(key, nonce, aad, plaintext),
        (Algorithm::AesGcm, _) => seal_with::<Aes256Gcm>(key, nonce, aad, plaintext),
        (Algorithm::ChaCha20Poly1305, _) => {
            seal_with::<ChaCha20Poly1305>(key, nonce, aad, plaintext)
        }
    }
}

/// Verifies and decrypts `ciphertext || tag`.
///
/// Every verification failure maps to the same [`CodecError::Authentication`].
pub(crate) fn open(
    algorithm: Algorithm,
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    sealed: &[u8],
) -> Result<Vec<u8>> {
    match (algorithm, key.len()) {
        (Algorithm::AesGcm, 16) => open_with::<Aes128Gcm>(key, nonce, aad, sealed),
        (Algorithm::AesGcm, _) => open_with::<Aes256Gcm>(key, nonce, aad, sealed),
        (Algorithm::ChaCha20Poly1305, _) => open_with::<ChaCha20Poly1305>(key, nonce, aad, sealed),
    }
}

fn init_cipher<C: SealCipher>(key: &DerivedKey) -> Result<C> {
    C::new_from_slice(key.as_bytes()).map_err(|_| CodecError::Encryption {
        message: "Cipher rejected the derived key".into(),
        context: Some(format!("key_len={}", key.len()).into()),
    })
}

fn init_nonce<C: SealCipher>(nonce: &[u8; NONCE_LEN]) -> Result<Nonce<C>> {
    Nonce::<C>::try_from(&nonce[..])
        .map_err(|_| CodecError::encryption("Cipher does not use a 96-bit nonce"))
}

fn seal_with<C: SealCipher>(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = init_cipher::<C>(key)?;
    let nonce = init_nonce::<C>(nonce)?;

    let mut buf = Zeroizing::new(Vec::with_capacity(plaintext.len() + TAG_LEN));
    buf.extend_from_slice(plaintext);

    let tag = cipher
        .encrypt_inout_detached(&nonce, aad, InOutBuf::from(buf.as_mut_slice()))
        .map_err(|_| CodecError::Encryption {
            message: "Encryption failed".into(),
            context: Some("AEAD encryption failed".into()),
        })?;

    buf.extend_from_slice(tag.as_slice());
    Ok(std::mem::take(&mut *buf))
}

fn open_with<C: SealCipher>(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    sealed: &[u8],
) -> Result<Vec<u8>> {
    if sealed.len() < TAG_LEN {
        return Err(CodecError::format("Ciphertext is shorter than the authentication tag"));
    }

    let cipher = init_cipher::<C>(key)?;
    let nonce = init_nonce::<C>(nonce)?;

    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
    let tag = Tag::<C>::try_from(tag).map_err(|_| CodecError::authentication())?;

    // Wiped on the error path; handed to the caller on success.
    let mut buf = Zeroizing::new(ciphertext.to_vec());

    cipher
        .decrypt_inout_detached(&nonce, aad, InOutBuf::from(buf.as_mut_slice()), &tag)
        .map_err(|_| CodecError::authentication())?;

    Ok(std::mem::take(&mut *buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::{MIN_ITERATIONS, derive_key};

    const NONCE: [u8; NONCE_LEN] = [7u8; NONCE_LEN];

    fn key(bits: u32) -> DerivedKey {
        derive_key(b"cipher-test", [1u8; 16], MIN_ITERATIONS, bits).unwrap()
    }

    #[test]
    fn test_seal_open_all_ciphers() {
        for (algorithm, bits) in
            [(Algorithm::AesGcm, 128), (Algorithm::AesGcm, 256), (Algorithm::ChaCha20Poly1305, 256)]
        {
            let key = key(bits);
            let sealed = seal(algorithm, &key, &NONCE, b"ctx", b"payload").unwrap();
            assert_eq!(sealed.len(), b"payload".len() + TAG_LEN);

            let opened = open(algorithm, &key, &NONCE, b"ctx", &sealed).unwrap();
            assert_eq!(opened, b"payload");
        }
    }

    #[test]
    fn test_sealed_buffer_is_exact_and_hides_plaintext() {
        let plaintext = [0x41u8; 64];
        let sealed = seal(Algorithm::AesGcm, &key(256), &NONCE, b"", &plaintext).unwrap();

        assert_eq!(sealed.len(), plaintext.len() + TAG_LEN);
        assert!(!sealed.windows(16).any(|w| w == &plaintext[..16]));
    }

    #[test]
    fn test_chacha_rejects_short_key_at_init() {
        let result = seal(Algorithm::ChaCha20Poly1305, &key(128), &NONCE, b"", b"payload");
        assert!(matches!(result, Err(CodecError::Encryption { .. })));
    }

    #[test]
    fn test_open_with_other_algorithm_fails_authentication() {
        let key = key(256);
        let sealed = seal(Algorithm::AesGcm, &key, &NONCE, b"", b"payload").unwrap();

        let result = open(Algorithm::ChaCha20Poly1305, &key, &NONCE, b"", &sealed);
        assert!(matches!(result, Err(CodecError::Authentication { .. })));
    }

    #[test]
    fn test_open_truncated_is_format_error() {
        let result = open(Algorithm::AesGcm, &key(256), &NONCE, b"", &[0u8; TAG_LEN - 1]);
        assert!(matches!(result, Err(CodecError::Format { .. })));
    }

    #[test]
    fn test_algorithm_key_length_support() {
        assert!(Algorithm::AesGcm.supports_key_length(128));
        assert!(Algorithm::AesGcm.supports_key_length(256));
        assert!(!Algorithm::AesGcm.supports_key_length(192));
        assert!(Algorithm::ChaCha20Poly1305.supports_key_length(256));
        assert!(!Algorithm::ChaCha20Poly1305.supports_key_length(128));
    }
}
