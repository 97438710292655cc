pub mod audit;
pub mod auth;
pub mod chemical;
pub mod equipment;
pub mod user;
pub mod verification;

use thiserror::Error;

use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 100;
pub const LOCATION_MAX_LEN: usize = 255;

/// Rejects blank values and values longer than `max` characters.
pub(crate) fn check_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{}: this field may not be blank", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!("{}: ensure this field has no more than {} characters", field, max)));
    }
    Ok(())
}

/// A stored or submitted value that is not one of an enumeration's choices.
#[derive(Debug, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct InvalidChoice {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of string choices persisted as TEXT.
///
/// Generates `as_str`, `Display`, `FromStr` and `TryFrom<String>` (the latter
/// is what `#[sqlx(try_from = "String")]` uses when decoding rows).
macro_rules! string_choices {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::models::InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::domain::models::InvalidChoice {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::models::InvalidChoice;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use string_choices;
