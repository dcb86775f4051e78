//! Macro for implementing Display and FromStr for tag enums
//!
//! Tag enums (error kinds, session phases, connector kinds) are rendered as
//! lowercase identifiers in logs and configuration, and parsed back
//! case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use tickbook_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SyncPhase {
//!     Idle,
//!     Refreshing,
//! }
//!
//! impl_domain_status_conversions!(SyncPhase {
//!     Idle => "idle",
//!     Refreshing => "refreshing",
//! });
//!
//! assert_eq!(SyncPhase::Refreshing.to_string(), "refreshing");
//! assert_eq!("IDLE".parse::<SyncPhase>(), Ok(SyncPhase::Idle));
//! ```

/// Implements Display and FromStr traits for tag enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
