//! Helper macro for declaring driven-port error enums.
//!
//! Each variant names its display message and the domain [`Error`]
//! constructor it maps onto, so services can propagate adapter failures with
//! `?` and still surface the right category to callers.
//!
//! [`Error`]: crate::domain::Error

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[allow(dead_code, reason = "constructors exist for every variant")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[allow(dead_code, reason = "constructors exist for every variant")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $message:expr => $maps_to:ident
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }

        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                let message = value.to_string();
                match value {
                    $( $name::$variant { .. } => $crate::domain::Error::$maps_to(message), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
