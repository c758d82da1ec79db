//! Macro generating the error enums of the marketplace's driven ports.
//!
//! Two forms are accepted:
//!
//! - `pub enum Name for "label";` declares a store error with the
//!   `Connection` and `Query` variants every repository and the geo index
//!   share. `store_errors` maps them onto 503 and 500 respectively.
//! - `pub enum Name { Variant { field: Type, .. } => "message", .. }`
//!   declares a free-form error for ports that are not stores (image
//!   resolution, push dispatch, metrics export).
//!
//! Either way each variant gets a snake_case constructor taking
//! `impl Into<FieldType>` per field, so adapters can write
//! `ProductRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident for $label:literal;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error("{label} connection failed: {message}", label = $label)]
            Connection { message: String },
            /// A query or mutation failed during execution.
            #[error("{label} query failed: {message}", label = $label)]
            Query { message: String },
        }

        impl $name {
            define_port_error!(@ctor Connection () () message: String,);
            define_port_error!(@ctor Query () () message: String,);
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant () () $( $field : $ty, )*);
            )*
        }
    };
}

pub(crate) use define_port_error;
