//! Command/response framing and transport abstractions for smart card APDU
//! exchanges.
//!
//! APDU (Application Protocol Data Unit) is the half-duplex command/response
//! unit exchanged with a smart card or security token. This crate provides
//! the pieces an application-protocol crate builds on:
//!
//! - Building and serializing APDU commands
//! - Splitting responses into payload and status word
//! - A narrow [`CardTransport`] trait over a pre-opened exclusive session
//! - A [`CardExecutor`] that drives the send/continue loop, reassembling
//!   responses the device splits across multiple APDUs
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

mod error;
pub use error::{Error, Result, StatusError, TransportError};

pub use command::Command;
pub use executor::{CardExecutor, Executor};
pub use response::Response;
pub use response::status::StatusWord;
pub use transport::CardTransport;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, CardExecutor, CardTransport, Command, Error, Executor, Response, Result,
        StatusError, StatusWord, TransportError,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.class(), 0x00);
        assert_eq!(cmd.instruction(), 0xA4);

        let resp = Response::new(Bytes::from_static(&[0x01, 0x02]), (0x90, 0x00));
        assert!(resp.status().is_success());
        assert_eq!(resp.payload(), &[0x01, 0x02][..]);
    }
}
