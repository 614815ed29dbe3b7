//! Transport trait for APDU communication
//!
//! A transport wraps a pre-opened, exclusive session with a device. It moves
//! raw bytes and knows nothing about command structure or protocol details.
//! Reader discovery and connection setup live outside this crate.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::TransportError;

/// Trait for card transports
///
/// Exchanges are strictly sequential: implementations are driven through
/// `&mut self`, so a second exchange cannot start before the first returns.
/// The exclusive session is held for the lifetime of the transport and
/// released exactly once by [`close`](Self::close).
pub trait CardTransport: Send + Sync + fmt::Debug {
    /// Send raw APDU bytes to the device and return the raw response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode(command), "transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    ///
    /// This is the method that concrete implementations should override.
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a device
    fn is_connected(&self) -> bool;

    /// Release the exclusive session
    ///
    /// Must be idempotent; called exactly once by a well-behaved client.
    fn close(&mut self) -> Result<(), TransportError>;
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    /// Mock responses to return, in order
    pub responses: Vec<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
}

#[cfg(test)]
impl MockTransport {
    pub(crate) fn new(responses: Vec<Bytes>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            connected: true,
        }
    }

    pub(crate) fn with_response(response: Bytes) -> Self {
        Self::new(vec![response])
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission);
        }

        Ok(self.responses.remove(0))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }
}
