use sealkit_codec::prelude::*;
use sealkit_codec::{load_config, load_config_with_env};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_config_reads_toml_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codec.toml");
    fs::write(
        &path,
        "iterations = 150000\nkey_length_bits = 256\nalgorithm = \"chacha20-poly1305\"\n",
    )?;

    let config = load_config(&path)?;

    assert_eq!(config.iterations, 150_000);
    assert_eq!(config.key_length_bits, 256);
    assert_eq!(config.algorithm, Algorithm::ChaCha20Poly1305);
    Ok(())
}

#[test]
fn load_config_fills_missing_fields_with_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("partial.toml");
    fs::write(&path, "key_length_bits = 128\n")?;

    let config = load_config(&path)?;

    assert_eq!(config, CodecConfig { key_length_bits: 128, ..CodecConfig::default() });
    Ok(())
}

#[test]
fn load_config_rejects_weak_iterations() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("weak.toml");
    fs::write(&path, "iterations = 1000\n")?;

    let result = load_config(&path);
    assert!(matches!(result, Err(CodecError::Configuration { .. })));
    Ok(())
}

#[test]
fn load_config_reports_missing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    let result = load_config(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(CodecError::Settings { context: Some(_), .. })));
    Ok(())
}

#[test]
fn load_config_rejects_unknown_algorithm() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ecb.toml");
    fs::write(&path, "algorithm = \"aes-ecb\"\n")?;

    let result = load_config(&path);
    assert!(matches!(result, Err(CodecError::Settings { .. })));
    Ok(())
}

fn env_vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn env_overrides_file_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codec.toml");
    fs::write(&path, "iterations = 150000\nkey_length_bits = 256\n")?;

    let vars = env_vars(&[
        ("SEALKIT__ITERATIONS", "200000"),
        ("SEALKIT__KEY_LENGTH_BITS", "128"),
    ]);
    let config = load_config_with_env(&path, vars)?;

    assert_eq!(config.iterations, 200_000);
    assert_eq!(config.key_length_bits, 128);
    assert_eq!(config.algorithm, Algorithm::AesGcm);
    Ok(())
}

#[test]
fn env_selects_algorithm() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codec.toml");
    fs::write(&path, "iterations = 150000\n")?;

    let vars = env_vars(&[("SEALKIT__ALGORITHM", "chacha20-poly1305")]);
    let config = load_config_with_env(&path, vars)?;

    assert_eq!(config.algorithm, Algorithm::ChaCha20Poly1305);
    assert_eq!(config.iterations, 150_000);
    Ok(())
}

#[test]
fn env_ignores_unprefixed_variables() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codec.toml");
    fs::write(&path, "iterations = 150000\n")?;

    let vars = env_vars(&[("ITERATIONS", "1"), ("OTHER__ITERATIONS", "1")]);
    let config = load_config_with_env(&path, vars)?;

    assert_eq!(config.iterations, 150_000);
    Ok(())
}

#[test]
fn env_weak_iterations_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("codec.toml");
    fs::write(&path, "iterations = 150000\n")?;

    let vars = env_vars(&[("SEALKIT__ITERATIONS", "5000")]);
    let result = load_config_with_env(&path, vars);

    assert!(matches!(result, Err(CodecError::Configuration { .. })));
    Ok(())
}
