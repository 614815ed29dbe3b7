//! Core error types for APDU operations

use std::fmt;

use crate::response::status::StatusWord;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a failed transport operation
///
/// Transport errors mean the bytes never made it to the device (or its reply
/// never made it back); they are distinct from a device rejecting a request
/// via its status word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Not connected to a device
    #[error("failed to connect to device")]
    Connection,

    /// Failed to transmit or receive data
    #[error("failed to transmit data")]
    Transmission,

    /// The underlying device or driver reported an error
    #[error("device error: {0}")]
    Device(String),
}

/// Error carrying a non-success, non-continuation device status word
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        self.status
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status.description() {
            "unknown status word" => write!(f, "unknown status ({:#06X})", self.status.to_u16()),
            description => write!(f, "{} ({})", description, self.status),
        }
    }
}

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device rejected the exchange with a status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Response shorter than the 2-byte status word
    #[error("incomplete response ({0} bytes)")]
    IncompleteResponse(usize),
}

impl Error {
    /// Create a status error from individual status bytes
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status(StatusError::new(sw1, sw2))
    }

    /// The status word carried by this error, if it is a status error
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status(e) => Some(e.status),
            _ => None,
        }
    }
}

impl From<StatusWord> for Error {
    fn from(status: StatusWord) -> Self {
        Self::Status(StatusError { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        assert_eq!(
            StatusError::new(0x69, 0x82).to_string(),
            "authentication required (69 82)"
        );
        assert_eq!(
            StatusError::new(0xAB, 0xCD).to_string(),
            "unknown status (0xABCD)"
        );
    }

    #[test]
    fn test_error_status_word() {
        let err = Error::status(0x6A, 0x80);
        assert_eq!(err.status_word(), Some(StatusWord::new(0x6A, 0x80)));
        assert_eq!(
            Error::Transport(TransportError::Transmission).status_word(),
            None
        );
    }
}
