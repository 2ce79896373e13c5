//! Per-action access rules.
//!
//! [`authorize`] checks a [`Capability`] against an [`Identity`] and hands back
//! the acting user on success. Denials keep "who are you?" apart from "you
//! may not": the first maps to `unauthorized`, the second to `forbidden`.

use super::{Error, Identity, User, UserId};

/// What an action requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Any signed-in user.
    Authenticated,
    /// A signed-in user holding the admin flag.
    Admin,
    /// The signed-in user who owns a resource.
    Owner(&'a UserId),
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// The caller is anonymous.
    #[error("authentication required")]
    AuthenticationRequired,
    /// The caller is signed in but lacks the capability.
    #[error("access denied")]
    Forbidden,
}

impl From<Denial> for Error {
    fn from(value: Denial) -> Self {
        match value {
            Denial::AuthenticationRequired => Error::login_required(),
            Denial::Forbidden => Error::forbidden("Access denied"),
        }
    }
}

/// Check `capability` for `identity`, returning the acting user.
///
/// # Examples
/// ```
/// use quill::domain::{Capability, Denial, Identity, authorize};
///
/// let outcome = authorize(Capability::Authenticated, &Identity::Anonymous);
/// assert_eq!(outcome, Err(Denial::AuthenticationRequired));
/// ```
pub fn authorize<'i>(capability: Capability<'_>, identity: &'i Identity) -> Result<&'i User, Denial> {
    let user = identity.user().ok_or(Denial::AuthenticationRequired)?;
    let allowed = match capability {
        Capability::Authenticated => true,
        Capability::Admin => user.is_admin(),
        Capability::Owner(owner) => user.id() == owner,
    };
    if allowed { Ok(user) } else { Err(Denial::Forbidden) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, ErrorCode, PasswordHash, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn signed_in(is_admin: bool) -> Identity {
        Identity::Authenticated(
            User::builder(
                UserId::random(),
                Username::new("member").expect("username"),
                EmailAddress::new("member@example.com").expect("email"),
                PasswordHash::new("hash"),
                Utc::now(),
            )
            .admin(is_admin)
            .build(),
        )
    }

    const SOMEONE: UserId = UserId::from_uuid(uuid::Uuid::nil());

    #[rstest]
    #[case(Capability::Authenticated)]
    #[case(Capability::Admin)]
    #[case(Capability::Owner(&SOMEONE))]
    fn anonymous_callers_must_authenticate(#[case] capability: Capability<'static>) {
        assert_eq!(
            authorize(capability, &Identity::Anonymous),
            Err(Denial::AuthenticationRequired)
        );
    }

    #[rstest]
    #[case(false, Err(Denial::Forbidden))]
    #[case(true, Ok(()))]
    fn admin_capability_requires_the_flag(
        #[case] is_admin: bool,
        #[case] expected: Result<(), Denial>,
    ) {
        let identity = signed_in(is_admin);
        assert_eq!(authorize(Capability::Admin, &identity).map(|_| ()), expected);
    }

    #[rstest]
    fn ownership_compares_user_ids() {
        let identity = signed_in(false);
        let own_id = *identity.user_id().expect("signed in");
        assert!(authorize(Capability::Owner(&own_id), &identity).is_ok());
        assert_eq!(
            authorize(Capability::Owner(&UserId::random()), &identity).map(|_| ()),
            Err(Denial::Forbidden)
        );
    }

    #[rstest]
    fn admins_do_not_bypass_ownership() {
        let identity = signed_in(true);
        assert_eq!(
            authorize(Capability::Owner(&UserId::random()), &identity).map(|_| ()),
            Err(Denial::Forbidden)
        );
    }

    #[rstest]
    #[case(Denial::AuthenticationRequired, ErrorCode::Unauthorized)]
    #[case(Denial::Forbidden, ErrorCode::Forbidden)]
    fn denials_keep_distinct_codes(#[case] denial: Denial, #[case] code: ErrorCode) {
        assert_eq!(Error::from(denial).code(), code);
    }
}
