//! A password-based authenticated container codec.
//!
//! This crate turns a password and a plaintext into a self-describing encrypted container,
//! and back. Keys are derived with PBKDF2-HMAC-SHA256; payloads are sealed with an AEAD
//! cipher (AES-GCM or ChaCha20-Poly1305). Unauthenticated modes are not available.
//!
//! ## Container Format
//!
//! ```text
//! [SALT(16)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
//! ```
//!
//! Salt and nonce are fixed-width, so no length prefixes are needed. The algorithm,
//! iteration count and key length are not stored; both sides share a [`CodecConfig`].
//! A text form, `base64(salt):base64(nonce):base64(ciphertext)`, is available through
//! [`SecureContainer::to_text`].
//!
//! ## Salt & Nonce Policy
//!
//! Every encryption draws a fresh 128-bit salt and a fresh 96-bit nonce from the
//! [`RandomSource`]. Because the salt changes per call, so does the derived key, and a
//! nonce is never reused under the same key.
//!
//! ## Errors
//!
//! A wrong password, mismatched associated data, and tampered bytes all surface as the
//! same [`CodecError::Authentication`], with no detail about where verification failed.
//!
//! ## Examples
//!
//! ```rust
//! use sealkit_codec::prelude::*;
//!
//! # fn main() -> Result<(), CodecError> {
//! let config = CodecConfig {
//!     iterations: 100_000,
//!     key_length_bits: 256,
//!     ..CodecConfig::default()
//! };
//!
//! let container = sealkit_codec::encrypt(b"AMOUNT=10&TID=19", b"testpass", &config)?;
//! let bytes = container.to_bytes();
//! assert_eq!(bytes.len(), 28 + 16 + 16);
//!
//! let restored = SecureContainer::from_bytes(&bytes)?;
//! let plaintext = sealkit_codec::decrypt(&restored, b"testpass", &config)?;
//! assert_eq!(plaintext, b"AMOUNT=10&TID=19");
//! # Ok(())
//! # }
//! ```

mod cipher;
mod codec;
pub mod config;
mod container;
mod error;
pub mod extensions;
pub mod kdf;
mod random;

pub use crate::cipher::Algorithm;
pub use crate::codec::{Codec, CodecBuilder, decrypt, encrypt};
pub use crate::config::{CodecConfig, load_config, load_config_with_env};
pub use crate::container::{HEADER_LEN, NONCE_LEN, SALT_LEN, SecureContainer, TAG_LEN};
pub use crate::error::{CodecError, CodecErrorExt, Result};
pub use crate::kdf::{DerivedKey, derive_key};
pub use crate::random::{OsRandom, RandomSource};

pub mod prelude {
    pub use crate::cipher::Algorithm;
    pub use crate::codec::Codec;
    pub use crate::config::CodecConfig;
    pub use crate::container::SecureContainer;
    pub use crate::error::{CodecError, CodecErrorExt};
    pub use crate::extensions::SealExt;
}
