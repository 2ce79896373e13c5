//! Signed, time-limited identity tokens.
//!
//! A token is `base64url(claims) "." base64url(HMAC-SHA256(secret, encoded
//! claims))` without padding, where the claims are a small JSON object naming
//! the user and the issue and expiry instants. Nothing is stored server side:
//! a token is valid while its signature checks out under the process secret
//! and the clock has not passed its expiry. Rotating the secret invalidates
//! every outstanding token.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use hmac::{Hmac, Mac};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a freshly issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;
/// Shortest secret accepted in release builds, in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;

/// Reasons a token is rejected or cannot be issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not two base64url segments wrapping JSON claims.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the claims under the current secret.
    #[error("token signature mismatch")]
    BadSignature,
    /// The expiry instant has passed.
    #[error("token expired")]
    Expired,
    /// Claims could not be encoded.
    #[error("failed to encode token claims: {message}")]
    Encoding {
        /// Encoder diagnostic.
        message: String,
    },
}

/// Signing secret shared by every token the process issues.
///
/// The bytes are wiped when the secret is dropped.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap secret bytes loaded from configuration.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Generate a random secret for development use.
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; TOKEN_SECRET_MIN_LEN * 2];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        <HmacSha256 as Mac>::new_from_slice(self.0.as_slice()).map_err(|err| {
            TokenError::Encoding {
                message: err.to_string(),
            }
        })
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSecret(<{} bytes>)", self.0.len())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates identity tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use quill::domain::{TokenSecret, TokenService, UserId};
///
/// let tokens = TokenService::new(TokenSecret::generate(), Arc::new(DefaultClock));
/// let user = UserId::random();
/// let token = tokens.issue(&user).expect("issue token");
/// assert_eq!(tokens.verify(&token), Ok(user));
/// ```
#[derive(Clone)]
pub struct TokenService {
    secret: TokenSecret,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TokenService {
    /// Create a service issuing tokens valid for [`TOKEN_TTL_DAYS`].
    pub fn new(secret: TokenSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            clock,
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user` expiring one TTL from now.
    pub fn issue(&self, user: &UserId) -> Result<String, TokenError> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            sub: user.to_string(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };
        let json = serde_json::to_vec(&claims).map_err(|err| TokenError::Encoding {
            message: err.to_string(),
        })?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.secret.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Validate `token` and return the user it names.
    ///
    /// The signature is checked in constant time before the claims are
    /// decoded.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.secret.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;
        if self.clock.utc().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }
        UserId::new(&claims.sub).map_err(|_| TokenError::Malformed)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &self.secret)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
