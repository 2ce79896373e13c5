//! Credential configuration parsing and validation.
//!
//! This module centralises the environment-driven settings for the token
//! signing secret and the credential cookie so they are validated
//! consistently and can be tested in isolation.

use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::{TOKEN_SECRET_MIN_LEN, TokenSecret};

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_FILE_ENV: &str = "QUILL_TOKEN_SECRET_FILE";
const COOKIE_SECURE_ENV: &str = "QUILL_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "QUILL_ALLOW_EPHEMERAL_SECRET";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for credential configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quill::inbound::http::credential_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Credential settings derived from configuration toggles.
#[derive(Debug)]
pub struct CredentialSettings {
    /// Secret used to sign identity tokens.
    pub secret: TokenSecret,
    /// Whether the credential cookie is marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating credential configuration.
#[derive(thiserror::Error, Debug)]
pub enum CredentialConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file exists but is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral secrets.
    #[error("QUILL_ALLOW_EPHEMERAL_SECRET must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build credential settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use quill::inbound::http::credential_config::{BuildMode, credential_settings_from_env};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&secret_path, vec![b'a'; 32])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "QUILL_TOKEN_SECRET_FILE" => Some(secret_path.clone()),
///     "QUILL_COOKIE_SECURE" => Some("1".to_string()),
///     "QUILL_ALLOW_EPHEMERAL_SECRET" => Some("0".to_string()),
///     _ => None,
/// });
///
/// let settings = credential_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.secret.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn credential_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<CredentialSettings, CredentialConfigError> {
    let cookie_secure = cookie_secure_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let secret = token_secret_from_env(env, mode, allow_ephemeral)?;

    Ok(CredentialSettings {
        secret,
        cookie_secure,
    })
}

fn cookie_secure_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<bool, CredentialConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid QUILL_COOKIE_SECURE; defaulting to secure");
                Ok(true)
            }
            None => Err(CredentialConfigError::InvalidEnv {
                name: COOKIE_SECURE_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => {
            warn!("QUILL_COOKIE_SECURE not set; defaulting to secure");
            Ok(true)
        }
        None => Err(CredentialConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<bool, CredentialConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) if mode.is_debug() => Ok(true),
            Some(true) => Err(CredentialConfigError::EphemeralNotAllowed),
            Some(false) => Ok(false),
            None if mode.is_debug() => {
                warn!(
                    value = %value,
                    "invalid QUILL_ALLOW_EPHEMERAL_SECRET; defaulting to disabled"
                );
                Ok(false)
            }
            None => Err(CredentialConfigError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => Ok(false),
        None => Err(CredentialConfigError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV,
        }),
    }
}

fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<TokenSecret, CredentialConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < TOKEN_SECRET_MIN_LEN {
                bytes.zeroize();
                return Err(CredentialConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            if length < TOKEN_SECRET_MIN_LEN {
                warn!(
                    path = %path.display(),
                    length,
                    "token secret shorter than recommended (dev only)"
                );
            }
            Ok(TokenSecret::new(bytes))
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary token secret; sessions end on restart (dev only)"
            );
            Ok(TokenSecret::generate())
        }
        Err(error) => Err(CredentialConfigError::SecretRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "credential_config_tests.rs"]
mod tests;
