//! Validation coverage for user value types.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn ada() -> User {
    User::builder(
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        Username::new("ada_l").expect("fixture username"),
        EmailAddress::new("ada@example.com").expect("fixture email"),
        PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
        DateTime::<Utc>::UNIX_EPOCH,
    )
    .build()
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("ab", UserValidationError::UsernameLength { min: USERNAME_MIN, max: USERNAME_MAX })]
#[case(
    "a234567890123456789012345678901",
    UserValidationError::UsernameLength { min: USERNAME_MIN, max: USERNAME_MAX }
)]
#[case("ada lovelace", UserValidationError::UsernameInvalidCharacters)]
#[case("ada-l", UserValidationError::UsernameInvalidCharacters)]
fn invalid_usernames_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
#[case("abc")]
#[case("Ada_Lovelace_1815")]
#[case("a23456789012345678901234567890")]
fn valid_usernames_are_accepted(#[case] raw: &str) {
    assert!(Username::new(raw).is_ok());
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("ada", UserValidationError::InvalidEmail)]
#[case("ada@example", UserValidationError::InvalidEmail)]
#[case("ada @example.com", UserValidationError::InvalidEmail)]
fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn emails_are_normalised_for_lookup() {
    let a = EmailAddress::new("Ada@Example.com").expect("valid");
    let b = EmailAddress::new(" ada@example.COM").expect("valid");
    assert_eq!(a, b);
}

#[rstest]
#[case("not-a-uuid")]
#[case("")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
fn malformed_ids_are_rejected(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn ids_serialise_as_strings() {
    let id = UserId::random();
    let value = serde_json::to_value(id).expect("serialise id");
    assert_eq!(value, json!(id.to_string()));
    let back: UserId = serde_json::from_value(value).expect("deserialise id");
    assert_eq!(back, id);
}

#[rstest]
fn registration_defaults_apply(ada: User) {
    assert!(!ada.is_admin());
    assert_eq!(ada.avatar(), DEFAULT_AVATAR);
    assert!(ada.bio().is_none());
}

#[rstest]
fn profile_hides_credentials(ada: User) {
    let value = serde_json::to_value(ada.profile()).expect("serialise profile");
    assert_eq!(value["username"], "ada_l");
    assert!(value.get("email").is_none());
    assert!(value.get("passwordHash").is_none());
    assert!(value.get("bio").is_none());
}

#[rstest]
fn account_view_exposes_admin_flag(ada: User) {
    let admin = User::builder(
        *ada.id(),
        ada.username().clone(),
        ada.email().clone(),
        ada.password_hash().clone(),
        ada.created_at(),
    )
    .admin(true)
    .bio("Analyst")
    .build();
    let value = serde_json::to_value(admin.account()).expect("serialise account");
    assert_eq!(value["isAdmin"], true);
    assert_eq!(value["bio"], "Analyst");
    assert_eq!(value["email"], "ada@example.com");
}

#[rstest]
fn password_hash_debug_is_redacted(ada: User) {
    let rendered = format!("{:?}", ada.password_hash());
    assert!(!rendered.contains("argon2"));
}
