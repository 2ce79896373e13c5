//! User data model.
//!
//! A [`User`] is the stored account record. It carries the password hash and
//! admin flag, so it is never serialised directly; adapters expose either the
//! [`UserAccount`] view (to the account holder) or the [`UserProfile`] view
//! (to everyone else).

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use super::identifier::uuid_identifier;

/// Avatar assigned to every new account.
pub const DEFAULT_AVATAR: &str = "default-avatar.png";
/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 30;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username length is out of range.
    #[error("username must be between {min} and {max} characters")]
    UsernameLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// The username contains characters other than letters, digits or `_`.
    #[error("username may only contain letters, numbers, and underscores")]
    UsernameInvalidCharacters,
    /// The email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email does not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
}

uuid_identifier! {
    /// Stable user identifier stored as a UUID.
    pub struct UserId;
    invalid => UserValidationError = UserValidationError::InvalidId;
}

/// Unique handle chosen at registration.
///
/// ## Invariants
/// - Trimmed, `USERNAME_MIN..=USERNAME_MAX` characters.
/// - Only ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use quill::domain::Username;
    ///
    /// let name = Username::new("  ada_l ").expect("valid username");
    /// assert_eq!(name.as_ref(), "ada_l");
    /// assert!(Username::new("ad").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address used as the login identifier.
///
/// ## Invariants
/// - Trimmed and lower-cased, so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new(" Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Encoded password hash (PHC string). Never the raw password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a credential store.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Stored account record.
///
/// ## Invariants
/// - `password_hash` only ever holds a hash.
/// - `is_admin` is `false` for self-registered accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    is_admin: bool,
    avatar: String,
    bio: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Start building a user with the registration defaults.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use quill::domain::{EmailAddress, PasswordHash, User, UserId, Username};
    ///
    /// let user = User::builder(
    ///     UserId::random(),
    ///     Username::new("ada").unwrap(),
    ///     EmailAddress::new("ada@example.com").unwrap(),
    ///     PasswordHash::new("$argon2id$..."),
    ///     Utc::now(),
    /// )
    /// .build();
    /// assert!(!user.is_admin());
    /// assert_eq!(user.avatar(), "default-avatar.png");
    /// ```
    pub fn builder(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> UserBuilder {
        UserBuilder {
            user: Self {
                id,
                username,
                email,
                password_hash,
                is_admin: false,
                avatar: DEFAULT_AVATAR.to_owned(),
                bio: None,
                created_at,
            },
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account holds the admin capability.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Avatar image reference.
    pub fn avatar(&self) -> &str {
        self.avatar.as_str()
    }

    /// Optional biography.
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Public view exposed when resolving post and comment authors.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.to_string(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
        }
    }

    /// Self view returned to the account holder after register and login.
    pub fn account(&self) -> UserAccount {
        UserAccount {
            id: self.id,
            username: self.username.to_string(),
            email: self.email.to_string(),
            is_admin: self.is_admin,
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
        }
    }
}

/// Builder for [`User`] used by seeding code and tests.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// Grant or withhold the admin capability.
    #[must_use]
    pub fn admin(mut self, is_admin: bool) -> Self {
        self.user.is_admin = is_admin;
        self
    }

    /// Override the avatar reference.
    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.user.avatar = avatar.into();
        self
    }

    /// Set a biography.
    #[must_use]
    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.user.bio = Some(bio.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> User {
        self.user
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Unique handle.
    #[schema(example = "ada_l")]
    pub username: String,
    /// Avatar image reference.
    #[schema(example = "default-avatar.png")]
    pub avatar: String,
    /// Optional biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UserProfile {
    /// Stand-in for an author whose record could not be found.
    pub fn unknown(id: UserId) -> Self {
        Self {
            id,
            username: String::from("[deleted]"),
            avatar: DEFAULT_AVATAR.to_owned(),
            bio: None,
        }
    }
}

/// Account view returned to its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Stable identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Unique handle.
    pub username: String,
    /// Normalised login email.
    pub email: String,
    /// Admin capability flag.
    pub is_admin: bool,
    /// Avatar image reference.
    pub avatar: String,
    /// Optional biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests;
