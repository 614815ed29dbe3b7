//! Data types exchanged with the OATH applet

mod algorithm;
mod code;
mod credential;
mod select;
mod version;

pub use algorithm::Algorithm;
pub use code::Code;
pub use credential::{Credential, Label};
pub use select::Select;
pub use version::Version;

use std::fmt;

use crate::error::Error;

/// Kind of one-time password derivation a credential uses
///
/// Packed into the high nibble of the combined algorithm/type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OathType {
    /// Counter-based one-time passwords (RFC 4226)
    Hotp = 0x10,
    /// Time-based one-time passwords (RFC 6238)
    Totp = 0x20,
}

impl TryFrom<u8> for OathType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x10 => Ok(Self::Hotp),
            0x20 => Ok(Self::Totp),
            other => Err(Error::UnknownOathType(other)),
        }
    }
}

impl From<OathType> for u8 {
    fn from(kind: OathType) -> Self {
        kind as Self
    }
}

impl fmt::Display for OathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hotp => f.write_str("HOTP"),
            Self::Totp => f.write_str("TOTP"),
        }
    }
}
