//! Error taxonomy for OATH operations
//!
//! Callers are expected to branch on the variant: status errors mean the
//! device rejected the request (wrong code, no such credential), transport
//! and decode errors mean the exchange itself broke.

use ykoath_apdu_core::{StatusError, TransportError};

/// Result type for OATH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for OATH operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device rejected the exchange with a status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Response framing shorter than the 2-byte status word
    #[error("incomplete response ({0} bytes)")]
    IncompleteResponse(usize),

    /// Malformed TLV in a device response
    #[error("failed to decode response: {0}")]
    Decode(&'static str),

    /// A response carried a tag the instruction does not expect
    #[error("unknown tag ({0:#04x})")]
    UnexpectedTag(u8),

    /// A response carried no values where at least one was expected
    #[error("no values found in response")]
    NoValuesFound,

    /// Credential name exceeds the 64-byte limit
    #[error("name too long ({0} > 64)")]
    NameTooLong(usize),

    /// No stored credential matched the query
    #[error("no such name configured: {0}")]
    UnknownName(String),

    /// More than one stored credential matched the query
    #[error("multiple matches found: {0}")]
    MultipleMatches(String),

    /// The credential needs a touch but no callback was provided
    #[error("touch callback required")]
    TouchCallbackRequired,

    /// The touch callback failed
    #[error("touch callback failed")]
    TouchCallback(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The device failed the mutual challenge-response check
    #[error("invalid token response")]
    InvalidTokenResponse,

    /// Unrecognized HMAC algorithm byte
    #[error("unknown algorithm ({0:#04x})")]
    UnknownAlgorithm(u8),

    /// Unrecognized credential type byte
    #[error("unknown credential type ({0:#04x})")]
    UnknownOathType(u8),
}

impl From<ykoath_apdu_core::Error> for Error {
    fn from(err: ykoath_apdu_core::Error) -> Self {
        match err {
            ykoath_apdu_core::Error::Transport(e) => Self::Transport(e),
            ykoath_apdu_core::Error::Status(e) => Self::Status(e),
            ykoath_apdu_core::Error::IncompleteResponse(n) => Self::IncompleteResponse(n),
        }
    }
}

impl Error {
    /// The status word carried by this error, if it is a status error
    pub const fn status_word(&self) -> Option<ykoath_apdu_core::StatusWord> {
        match self {
            Self::Status(e) => Some(e.status),
            _ => None,
        }
    }
}
