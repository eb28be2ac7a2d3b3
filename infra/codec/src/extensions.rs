//! # Codec Extensions
//!
//! This module provides the [`SealExt`] extension trait for sealing serializable values.
//! Values are encoded with `postcard` before encryption, and decoded after decryption.

use crate::codec::Codec;
use crate::error::{CodecErrorExt, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

/// An extension trait for serde types to provide ergonomic sealing.
///
/// This trait is automatically implemented for any type that implements
/// [`Serialize`] and [`DeserializeOwned`].
pub trait SealExt: Serialize + DeserializeOwned {
    /// Encodes the value with `postcard` and seals it into serialized container bytes.
    ///
    /// # Results
    /// Returns the serialized container bytes.
    ///
    /// # Errors
    /// * [`crate::CodecError::Serialization`] If the value cannot be encoded.
    /// * See [`Codec::encrypt_with_aad`] for encryption failures.
    fn seal(&self, codec: &Codec, password: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let bytes = Zeroizing::new(postcard::to_stdvec(self).context("Postcard encoding failed")?);
        codec.seal(bytes.as_slice(), password)
    }

    /// Opens serialized container bytes and decodes the value.
    ///
    /// # Results
    /// Returns the decoded value.
    ///
    /// # Errors
    /// * [`crate::CodecError::Format`] If `bytes` is not a valid container.
    /// * [`crate::CodecError::Authentication`] If the password is wrong or the data was altered.
    /// * [`crate::CodecError::Serialization`] If the plaintext does not decode as `Self`.
    fn open(codec: &Codec, bytes: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<Self> {
        let plaintext = Zeroizing::new(codec.open(bytes, password)?);
        postcard::from_bytes(&plaintext).context("Postcard decoding failed")
    }
}

impl<T: Serialize + DeserializeOwned> SealExt for T {}
