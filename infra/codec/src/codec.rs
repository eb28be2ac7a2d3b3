use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cipher::{self, Algorithm};
use crate::config::CodecConfig;
use crate::container::{NONCE_LEN, SALT_LEN, SecureContainer, TAG_LEN};
use crate::error::{CodecError, CodecErrorExt, Result};
use crate::kdf::{check_password, derive_key};
use crate::random::{OsRandom, RandomSource};

/// A password-based authenticated container codec.
///
/// `Codec` holds a validated [`CodecConfig`] and a shared [`RandomSource`]. It carries no
/// other state: every call derives its own key from a fresh salt and drops it before
/// returning. Cloning is cheap and the codec can be shared freely across threads.
///
/// ### Example
/// ```rust
/// use sealkit_codec::prelude::*;
///
/// # fn main() -> Result<(), CodecError> {
/// let codec = Codec::builder().iterations(10_000).build()?;
///
/// let container = codec.encrypt(b"AMOUNT=10&TID=19", b"testpass")?;
/// let bytes = container.to_bytes();
///
/// let restored = codec.open(&bytes, b"testpass")?;
/// assert_eq!(restored, b"AMOUNT=10&TID=19");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    config: CodecConfig,
    random: Arc<dyn RandomSource>,
}

impl Codec {
    /// Returns a new [`CodecBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    /// Creates a codec from a ready configuration, using the OS random source.
    ///
    /// # Results
    /// Returns a codec bound to `config`.
    ///
    /// # Errors
    /// Returns [`CodecError::Configuration`] if `config` fails validation.
    pub fn new(config: CodecConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encrypts `plaintext` under `password` with no associated data.
    ///
    /// # Results
    /// Returns a [`SecureContainer`] holding the salt, nonce, and sealed ciphertext.
    ///
    /// # Errors
    /// See [`Codec::encrypt_with_aad`].
    pub fn encrypt(
        &self,
        plaintext: impl AsRef<[u8]>,
        password: impl AsRef<[u8]>,
    ) -> Result<SecureContainer> {
        self.encrypt_with_aad(plaintext, password, &[])
    }

    /// Encrypts `plaintext` under `password`, binding `aad` into the authentication tag.
    ///
    /// A fresh salt and nonce are drawn for every call. The associated data is not stored
    /// in the container and must be supplied again on decryption.
    ///
    /// # Results
    /// Returns a [`SecureContainer`] whose tag also covers `aad`.
    ///
    /// # Errors
    /// * [`CodecError::Configuration`] If `password` is empty.
    /// * [`CodecError::Encryption`] If the random source fails or the cipher cannot be
    ///   initialized.
    #[instrument(
        level = "debug",
        skip_all,
        fields(algorithm = %self.config.algorithm, iterations = self.config.iterations)
    )]
    pub fn encrypt_with_aad(
        &self,
        plaintext: impl AsRef<[u8]>,
        password: impl AsRef<[u8]>,
        aad: &[u8],
    ) -> Result<SecureContainer> {
        let password = password.as_ref();
        let plaintext = plaintext.as_ref();
        check_password(password)?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        self.random.fill(&mut salt).context("salt generation")?;
        self.random.fill(&mut nonce).context("nonce generation")?;

        let key = derive_key(password, salt, self.config.iterations, self.config.key_length_bits)?;
        let ciphertext = cipher::seal(self.config.algorithm, &key, &nonce, aad, plaintext)?;

        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "Container sealed"
        );
        Ok(SecureContainer::new(salt, nonce, ciphertext))
    }

    /// Decrypts `container` with `password` and no associated data.
    ///
    /// # Results
    /// Returns the recovered plaintext.
    ///
    /// # Errors
    /// See [`Codec::decrypt_with_aad`].
    pub fn decrypt(
        &self,
        container: &SecureContainer,
        password: impl AsRef<[u8]>,
    ) -> Result<Vec<u8>> {
        self.decrypt_with_aad(container, password, &[])
    }

    /// Decrypts `container` with `password`, verifying `aad` against the tag.
    ///
    /// # Results
    /// Returns the recovered plaintext once the tag verifies.
    ///
    /// # Errors
    /// * [`CodecError::Configuration`] If `password` is empty.
    /// * [`CodecError::Format`] If the ciphertext is too short to hold a tag.
    /// * [`CodecError::Authentication`] If the tag does not verify. A wrong password,
    ///   wrong associated data, and tampered bytes are indistinguishable.
    #[instrument(
        level = "debug",
        skip_all,
        fields(algorithm = %self.config.algorithm, iterations = self.config.iterations)
    )]
    pub fn decrypt_with_aad(
        &self,
        container: &SecureContainer,
        password: impl AsRef<[u8]>,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let password = password.as_ref();
        check_password(password)?;

        if container.ciphertext().len() < TAG_LEN {
            return Err(CodecError::Format {
                message: "Ciphertext is shorter than the authentication tag".into(),
                context: Some(format!("ciphertext_len={}", container.ciphertext().len()).into()),
            });
        }

        let key = derive_key(
            password,
            container.salt(),
            self.config.iterations,
            self.config.key_length_bits,
        )?;

        cipher::open(self.config.algorithm, &key, container.nonce(), aad, container.ciphertext())
            .inspect_err(|e| {
                if matches!(e, CodecError::Authentication { .. }) {
                    debug!("Container failed authentication");
                }
            })
    }

    /// Encrypts and serializes in one step.
    ///
    /// # Results
    /// Returns the serialized container bytes.
    ///
    /// # Errors
    /// See [`Codec::encrypt_with_aad`].
    pub fn seal(&self, plaintext: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.seal_with_aad(plaintext, password, &[])
    }

    /// Encrypts with associated data and serializes in one step.
    ///
    /// # Results
    /// Returns the serialized container bytes.
    ///
    /// # Errors
    /// See [`Codec::encrypt_with_aad`].
    pub fn seal_with_aad(
        &self,
        plaintext: impl AsRef<[u8]>,
        password: impl AsRef<[u8]>,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        self.encrypt_with_aad(plaintext, password, aad).map(|c| c.to_bytes())
    }

    /// Deserializes and decrypts in one step.
    ///
    /// # Results
    /// Returns the recovered plaintext.
    ///
    /// # Errors
    /// * [`CodecError::Format`] If `bytes` is not a valid container.
    /// * See [`Codec::decrypt_with_aad`] for the rest.
    pub fn open(&self, bytes: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.open_with_aad(bytes, password, &[])
    }

    /// Deserializes and decrypts with associated data in one step.
    ///
    /// # Results
    /// Returns the recovered plaintext.
    ///
    /// # Errors
    /// See [`Codec::open`].
    pub fn open_with_aad(
        &self,
        bytes: impl AsRef<[u8]>,
        password: impl AsRef<[u8]>,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let container = SecureContainer::from_bytes(bytes)?;
        self.decrypt_with_aad(&container, password, aad)
    }
}

/// A builder for [`Codec`].
///
/// Starts from [`CodecConfig::default`] (100 000 iterations, 256-bit AES-GCM) and the
/// OS random source.
#[derive(Debug, Default)]
pub struct CodecBuilder {
    config: CodecConfig,
    random: Option<Arc<dyn RandomSource>>,
}

impl CodecBuilder {
    /// Sets the PBKDF2 iteration count.
    #[must_use]
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Sets the derived key length in bits (`128` or `256`).
    #[must_use]
    pub const fn key_length_bits(mut self, bits: u32) -> Self {
        self.config.key_length_bits = bits;
        self
    }

    /// Selects the AEAD cipher.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Replaces all settings with `config`.
    #[must_use]
    pub const fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the random source used for salts and nonces.
    #[must_use]
    pub fn random_source(mut self, random: impl RandomSource) -> Self {
        self.random = Some(Arc::new(random));
        self
    }

    /// Validates the settings and builds the codec.
    ///
    /// # Results
    /// Returns a ready [`Codec`].
    ///
    /// # Errors
    /// Returns [`CodecError::Configuration`] if the settings are invalid.
    pub fn build(self) -> Result<Codec> {
        self.config.validate()?;
        let random = self.random.unwrap_or_else(|| Arc::new(OsRandom));
        Ok(Codec { config: self.config, random })
    }
}

/// Encrypts `plaintext` under `password` with the given configuration.
///
/// # Results
/// Returns a freshly salted [`SecureContainer`].
///
/// # Errors
/// * [`CodecError::Configuration`] If `config` is invalid or `password` is empty.
/// * [`CodecError::Encryption`] If the random source or cipher fails.
pub fn encrypt(
    plaintext: impl AsRef<[u8]>,
    password: impl AsRef<[u8]>,
    config: &CodecConfig,
) -> Result<SecureContainer> {
    Codec::new(*config)?.encrypt(plaintext, password)
}

/// Decrypts `container` with `password` under the given configuration.
///
/// # Results
/// Returns the recovered plaintext.
///
/// # Errors
/// * [`CodecError::Configuration`] If `config` is invalid or `password` is empty.
/// * [`CodecError::Format`] If the ciphertext is truncated.
/// * [`CodecError::Authentication`] If the password is wrong or the data was altered.
pub fn decrypt(
    container: &SecureContainer,
    password: impl AsRef<[u8]>,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    Codec::new(*config)?.decrypt(container, password)
}
