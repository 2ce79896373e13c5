//! Authentication primitives: login credentials and registration requests.
//!
//! Inbound adapters parse raw strings into these types before calling a
//! driving port, so services only ever see validated input. Passwords are kept
//! in [`Zeroizing`] buffers and wiped when dropped.

use serde_json::json;
use zeroize::Zeroizing;

use super::{EmailAddress, Error, UserValidationError, Username};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 6;

/// Errors raised when a login payload is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        let (field, code) = match value {
            LoginValidationError::EmptyEmail => ("email", "empty_email"),
            LoginValidationError::EmptyPassword => ("password", "empty_password"),
        };
        Error::invalid_request("Email and password are required")
            .with_details(json!({ "field": field, "code": code }))
    }
}

/// Login credentials as supplied by the caller.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not format-checked:
///   an unknown address simply fails authentication.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use quill::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Raw password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised when a registration payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// At least one of the four fields was blank.
    #[error("All fields are required")]
    MissingFields,
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
    /// Password is shorter than [`PASSWORD_MIN`].
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort {
        /// Lower bound.
        min: usize,
    },
    /// Username failed validation.
    #[error("{0}")]
    Username(UserValidationError),
    /// Email failed validation.
    #[error("{0}")]
    Email(UserValidationError),
}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        let message = value.to_string();
        let (field, code) = match &value {
            RegistrationValidationError::MissingFields => ("form", "missing_fields"),
            RegistrationValidationError::PasswordMismatch => {
                ("confirmPassword", "password_mismatch")
            }
            RegistrationValidationError::PasswordTooShort { .. } => {
                ("password", "password_too_short")
            }
            RegistrationValidationError::Username(_) => ("username", "invalid_username"),
            RegistrationValidationError::Email(_) => ("email", "invalid_email"),
        };
        Error::validation(field, code, message)
    }
}

/// Validated registration request.
///
/// Checks run in a fixed order: presence, confirmation, length, then username
/// and email format. Uniqueness is checked by the account service.
///
/// # Examples
/// ```
/// use quill::domain::{Registration, RegistrationValidationError};
///
/// let err = Registration::try_from_parts("ada", "ada@example.com", "secret1", "secret2")
///     .unwrap_err();
/// assert_eq!(err, RegistrationValidationError::PasswordMismatch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        if [username, email].iter().any(|value| value.trim().is_empty())
            || password.is_empty()
            || confirm_password.is_empty()
        {
            return Err(RegistrationValidationError::MissingFields);
        }
        if password != confirm_password {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let username = Username::new(username).map_err(RegistrationValidationError::Username)?;
        let email = EmailAddress::new(email).map_err(RegistrationValidationError::Email)?;
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password, to be hashed by the credential store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
