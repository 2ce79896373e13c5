//! Shared shape for opaque UUID-backed identifiers.

/// Declare a `Copy` newtype over [`uuid::Uuid`] that serialises as a string.
///
/// The generated type offers `new` (parse), `random`, `from_uuid` and
/// `as_uuid`, plus `Display` and `String` conversions for serde.
macro_rules! uuid_identifier {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
        invalid => $error_ty:ty = $error:expr;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier from its canonical string form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, $error_ty> {
                ::uuid::Uuid::parse_str(id.as_ref())
                    .map(Self)
                    .map_err(|_| $error)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = $error_ty;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use uuid_identifier;
