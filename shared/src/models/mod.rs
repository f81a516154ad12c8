//! Data models
//!
//! Shared between the HTTP service and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUIDs generated by PostgreSQL (`gen_random_uuid()`).
//! Status columns are stored as lowercase TEXT and mapped through
//! `TryFrom<String>` (`#[sqlx(try_from = "String")]`).

pub mod category;
pub mod menu_item;
pub mod modifier;
pub mod photo;
pub mod status;
pub mod table;
pub mod user;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use modifier::*;
pub use photo::*;
pub use status::*;
pub use table::*;
pub use user::*;

/// Error returned when a TEXT status column holds an unknown value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declare a lowercase string-backed enum with `as_str`, `parse`,
/// `TryFrom<String>` and snake_case serde.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Database / wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Parse the wire representation
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value).ok_or($crate::models::UnknownVariant {
                    kind: $kind,
                    value,
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;
