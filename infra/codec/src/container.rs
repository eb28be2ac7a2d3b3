use crate::error::{CodecError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

// --- Format constants ---

/// PBKDF2 salt length.
pub const SALT_LEN: usize = 16;

/// AEAD nonce length (96-bit).
pub const NONCE_LEN: usize = 12;

/// AEAD tag length (128-bit).
pub const TAG_LEN: usize = 16;

/// Fixed header length: `salt || nonce`.
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

const TEXT_SEPARATOR: char = ':';

// --- Container ---

/// A self-describing encrypted payload.
///
/// The serialized form uses the following fixed layout:
///
/// ```text
/// [SALT(16)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
/// ```
///
/// Salt and nonce are fixed-width, so the ciphertext simply consumes the rest of the
/// buffer. The container is immutable once produced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecureContainer {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl std::fmt::Debug for SecureContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureContainer")
            .field("salt_len", &SALT_LEN)
            .field("nonce_len", &NONCE_LEN)
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

impl SecureContainer {
    pub(crate) const fn new(
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self { salt, nonce, ciphertext }
    }

    /// Returns the key-derivation salt.
    #[must_use]
    pub const fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Returns the AEAD nonce.
    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Returns the ciphertext with the authentication tag appended.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Returns the length of the serialized form.
    #[must_use]
    pub fn len(&self) -> usize {
        HEADER_LEN + self.ciphertext.len()
    }

    /// Serializes the container into its fixed binary layout.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Parses a container from its fixed binary layout.
    ///
    /// Only the header is validated here; a ciphertext too short to hold a tag is
    /// rejected by [`crate::decrypt`].
    ///
    /// # Errors
    /// Returns [`CodecError::Format`] if `bytes` is shorter than 28 bytes.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() < HEADER_LEN {
            return Err(CodecError::Format {
                message: format!(
                    "Container too short ({} bytes). Expected at least {HEADER_LEN} bytes",
                    bytes.len()
                )
                .into(),
                context: None,
            });
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        Ok(Self {
            salt: salt.try_into().map_err(|_| CodecError::format("Invalid salt length"))?,
            nonce: nonce.try_into().map_err(|_| CodecError::format("Invalid nonce length"))?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encodes the container as `base64(salt):base64(nonce):base64(ciphertext)`.
    ///
    /// Uses the standard base64 alphabet with padding.
    #[must_use]
    pub fn to_text(&self) -> String {
        format!(
            "{}{TEXT_SEPARATOR}{}{TEXT_SEPARATOR}{}",
            STANDARD.encode(self.salt),
            STANDARD.encode(self.nonce),
            STANDARD.encode(&self.ciphertext)
        )
    }

    /// Parses the text form produced by [`SecureContainer::to_text`].
    ///
    /// # Errors
    /// Returns [`CodecError::Format`] if the text does not have exactly three parts,
    /// a part is not valid base64, or the salt or nonce has the wrong length.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut parts = text.trim().split(TEXT_SEPARATOR);
        let (Some(salt), Some(nonce), Some(ciphertext), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::format("Expected three ':'-separated parts"));
        };

        let salt = decode_part(salt, "salt")?;
        let nonce = decode_part(nonce, "nonce")?;
        let ciphertext = decode_part(ciphertext, "ciphertext")?;

        Ok(Self {
            salt: salt.as_slice().try_into().map_err(|_| CodecError::Format {
                message: "Invalid salt length".into(),
                context: Some(format!("expected {SALT_LEN}, got {}", salt.len()).into()),
            })?,
            nonce: nonce.as_slice().try_into().map_err(|_| CodecError::Format {
                message: "Invalid nonce length".into(),
                context: Some(format!("expected {NONCE_LEN}, got {}", nonce.len()).into()),
            })?,
            ciphertext,
        })
    }
}

fn decode_part(part: &str, name: &'static str) -> Result<Vec<u8>> {
    STANDARD.decode(part).map_err(|_| CodecError::Format {
        message: "Invalid base64".into(),
        context: Some(name.into()),
    })
}

impl TryFrom<&[u8]> for SecureContainer {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<&SecureContainer> for Vec<u8> {
    fn from(container: &SecureContainer) -> Self {
        container.to_bytes()
    }
}
