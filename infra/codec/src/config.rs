use crate::cipher::Algorithm;
use crate::error::{CodecError, CodecErrorExt, Result};
use crate::kdf::{DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH_BITS, check_iterations, key_len_bytes};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment prefix for configuration overrides, e.g. `SEALKIT__ITERATIONS`.
pub const ENV_PREFIX: &str = "SEALKIT";

/// Key-derivation and cipher parameters shared by the encrypting and decrypting side.
///
/// Passwords are never part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// PBKDF2 iteration count, at least [`crate::kdf::MIN_ITERATIONS`].
    pub iterations: u32,
    /// Derived key length in bits: `128` or `256`.
    pub key_length_bits: u32,
    /// AEAD cipher.
    pub algorithm: Algorithm,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_length_bits: DEFAULT_KEY_LENGTH_BITS,
            algorithm: Algorithm::default(),
        }
    }
}

impl CodecConfig {
    /// Checks the iteration count, key length, and algorithm pairing.
    ///
    /// # Errors
    /// Returns [`CodecError::Configuration`] on the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        check_iterations(self.iterations)?;
        key_len_bytes(self.key_length_bits)?;

        if !self.algorithm.supports_key_length(self.key_length_bits) {
            return Err(CodecError::Configuration {
                message: "Algorithm does not support the configured key length".into(),
                context: Some(
                    format!(
                        "algorithm={}, key_length_bits={}",
                        self.algorithm, self.key_length_bits
                    )
                    .into(),
                ),
            });
        }

        Ok(())
    }
}

/// Loads a [`CodecConfig`] from a file, layered under environment overrides.
///
/// 1. **Base File**: Any format the `config` crate recognizes by extension (e.g. `codec.toml`).
/// 2. **Environment Overrides**: Variables prefixed with `SEALKIT__`
///    (`SEALKIT__ITERATIONS`, `SEALKIT__KEY_LENGTH_BITS`, `SEALKIT__ALGORITHM`).
///
/// Fields missing from both sources fall back to [`CodecConfig::default`].
///
/// # Errors
/// * [`CodecError::Settings`] If the file is missing or cannot be deserialized.
/// * [`CodecError::Configuration`] If the loaded values fail [`CodecConfig::validate`].
///
/// # Example
/// ```rust,no_run
/// use sealkit_codec::config::load_config;
///
/// let config = load_config("config/codec.toml").unwrap_or_default();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CodecConfig> {
    load_layered(path.as_ref(), environment())
}

/// Loads a [`CodecConfig`] like [`load_config`], reading overrides from `vars` instead of
/// the process environment.
///
/// Keys keep their `SEALKIT__` prefix, e.g. `SEALKIT__ALGORITHM`.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with_env(
    path: impl AsRef<Path>,
    vars: Map<String, String>,
) -> Result<CodecConfig> {
    load_layered(path.as_ref(), environment().source(Some(vars)))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true) // Env var overrides (e.g., SEALKIT__ITERATIONS)
}

fn load_layered(path: &Path, env: Environment) -> Result<CodecConfig> {
    let builder = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env);

    info!("Loading codec config from {}", path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<CodecConfig>()
        .context("Failed to deserialize config")?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::MIN_ITERATIONS;

    #[test]
    fn test_default_is_valid() {
        let config = CodecConfig::default();

        assert_eq!(config.iterations, 100_000);
        assert_eq!(config.key_length_bits, 256);
        assert_eq!(config.algorithm, Algorithm::AesGcm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            CodecConfig { iterations: MIN_ITERATIONS - 1, ..CodecConfig::default() },
            CodecConfig { key_length_bits: 192, ..CodecConfig::default() },
            CodecConfig { key_length_bits: 0, ..CodecConfig::default() },
            CodecConfig {
                key_length_bits: 128,
                algorithm: Algorithm::ChaCha20Poly1305,
                ..CodecConfig::default()
            },
        ];

        for case in cases {
            assert!(
                matches!(case.validate(), Err(CodecError::Configuration { .. })),
                "{case:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_minimum_iterations_accepted() {
        let config = CodecConfig { iterations: MIN_ITERATIONS, ..CodecConfig::default() };
        assert!(config.validate().is_ok());
    }
}
