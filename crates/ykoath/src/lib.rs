//! Client for the YKOATH protocol spoken by YubiKey OATH applets.
//!
//! YKOATH stores HOTP ([RFC 4226]) and TOTP ([RFC 6238]) credentials on a
//! hardware token and computes one-time passwords on demand, optionally
//! after PIN authentication and/or a physical touch. This crate implements
//! the application layer: TLV framing, the instruction set (SELECT, LIST,
//! PUT, DELETE, CALCULATE, CALCULATE ALL, VALIDATE, SET CODE, RESET), OTP
//! truncation, and the PIN challenge-response handshake.
//!
//! Byte-level transmission is behind the
//! [`CardTransport`](ykoath_apdu_core::CardTransport) trait; connect it to
//! a PC/SC (or other) backend that holds an exclusive session with the
//! token.
//!
//! ```no_run
//! # fn run(transport: impl ykoath_apdu_core::CardTransport) -> ykoath::Result<()> {
//! let mut session = ykoath::OathSession::new(transport);
//! session.select()?;
//! let otp = session.calculate("github", None)?;
//! println!("{otp}");
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 4226]: https://datatracker.ietf.org/doc/html/rfc4226
//! [RFC 6238]: https://datatracker.ietf.org/doc/html/rfc6238
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod commands;
mod constants;
mod error;
mod session;
pub mod tlv;
mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use session::{OathSession, TouchCallback};
pub use types::{Algorithm, Code, Credential, Label, OathType, Select, Version};

// Re-export the APDU substrate so transport implementations do not need a
// separate dependency on it.
pub use ykoath_apdu_core as apdu;
