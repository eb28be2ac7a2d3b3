//! # Codec Errors
//!
//! This module defines the [`CodecError`] enum and [`Result`] type used throughout
//! the codec for reporting configuration, framing, authentication, and cipher failures.
//!
//! Messages never carry password bytes, derived key bytes, salts, or nonces.

use std::borrow::Cow;

/// A specialized [`Result`] type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// A specialized [`CodecError`] enum for codec-related failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Invalid iteration count, key length, algorithm pairing, salt length, or empty password.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The serialized container is malformed or truncated.
    #[error("Invalid container format{}: {message}", format_context(.context))]
    Format { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The authentication tag did not verify.
    ///
    /// Wrong password, mismatched associated data, and tampered bytes all end up here.
    /// The message is fixed and never says which byte failed.
    #[error("Authentication failed{}", format_context(.context))]
    Authentication { context: Option<Cow<'static, str>> },

    /// Failure inside key derivation, cipher initialization, or the random source.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during Postcard serialization or deserialization of typed payloads.
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: postcard::Error, context: Option<Cow<'static, str>> },

    /// Failure while loading configuration sources.
    #[error("Settings error{}: {source}", format_context(.context))]
    Settings { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

impl CodecError {
    pub(crate) fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Configuration { message: message.into(), context: None }
    }

    pub(crate) fn format(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Format { message: message.into(), context: None }
    }

    pub(crate) fn encryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Encryption { message: message.into(), context: None }
    }

    pub(crate) const fn authentication() -> Self {
        Self::Authentication { context: None }
    }
}

impl From<postcard::Error> for CodecError {
    fn from(source: postcard::Error) -> Self {
        Self::Serialization { source, context: None }
    }
}

impl From<config::ConfigError> for CodecError {
    fn from(source: config::ConfigError) -> Self {
        Self::Settings { source, context: None }
    }
}

/// Adds a human-readable context to a failed result.
pub trait CodecErrorExt<T> {
    /// Attaches `context` to the error, if any.
    ///
    /// # Errors
    /// Returns the original error, converted into [`CodecError`], with the context set.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T> CodecErrorExt<T> for Result<T> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                CodecError::Configuration { context: c, .. }
                | CodecError::Format { context: c, .. }
                | CodecError::Authentication { context: c }
                | CodecError::Encryption { context: c, .. }
                | CodecError::Serialization { context: c, .. }
                | CodecError::Settings { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> CodecErrorExt<T> for std::result::Result<T, postcard::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| CodecError::Serialization { source, context: Some(context.into()) })
    }
}

impl<T> CodecErrorExt<T> for std::result::Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|source| CodecError::Settings { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
