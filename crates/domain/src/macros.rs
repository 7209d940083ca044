//! Macro for wire-name conversions of small domain enums
//!
//! Generates `as_str`, `Display` and `FromStr` from one variant-to-name
//! table so the three stay in agreement. Parsing ignores case and
//! surrounding whitespace.
//!
//! # Example
//!
//! ```rust
//! use eyecare_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Eye {
//!     Left,
//!     Right,
//! }
//!
//! impl_wire_name_conversions!(Eye {
//!     Left => "left",
//!     Right => "right",
//! });
//!
//! assert_eq!(Eye::Left.as_str(), "left");
//! assert_eq!(" RIGHT ".parse::<Eye>(), Ok(Eye::Right));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for an enum
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire names
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Name used on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
