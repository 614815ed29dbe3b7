//! Card executor for APDU command execution
//!
//! The executor layers response-chaining on top of a raw transport: short
//! responses pass straight through, while `61 XX` trailers trigger a
//! continuation loop that stitches the fragments back into a single payload.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::{
    Command, Response,
    error::{Error, Result},
    transport::CardTransport,
};

/// Instruction byte for the ISO 7816-4 GET RESPONSE command
pub const INS_GET_RESPONSE: u8 = 0xC0;

/// Trait defining a card executor
pub trait Executor: Send + Sync {
    /// Send a command and receive the complete response payload
    ///
    /// Continuation is resolved internally: the returned bytes are the full
    /// reassembled payload with status trailers stripped. A non-success
    /// final status is surfaced as [`Error::Status`] and any partial data
    /// is discarded.
    fn transmit(&mut self, command: &Command) -> Result<Bytes> {
        trace!(
            ins = format_args!("{:#04X}", command.instruction()),
            "executing command"
        );
        let result = self.do_transmit(command);
        match &result {
            Ok(payload) => {
                trace!(payload = %hex::encode(payload), "command succeeded");
            }
            Err(e) => {
                debug!(error = %e, "command failed");
            }
        }
        result
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &Command) -> Result<Bytes>;

    /// Release the underlying transport session
    fn close(&mut self) -> Result<()>;
}

/// Standard implementation of an executor
///
/// `send_remaining_ins` is the instruction used to fetch follow-up frames in
/// the continuation loop. It defaults to ISO GET RESPONSE; applications with
/// a protocol-specific instruction override it via
/// [`with_send_remaining`](Self::with_send_remaining).
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Instruction byte for continuation requests
    send_remaining_ins: u8,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new executor with the ISO GET RESPONSE continuation instruction
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            send_remaining_ins: INS_GET_RESPONSE,
        }
    }

    /// Create a new executor with a custom continuation instruction
    pub fn with_send_remaining(transport: T, ins: u8) -> Self {
        Self {
            transport,
            send_remaining_ins: ins,
        }
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the executor and return the underlying transport
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &Command) -> Result<Bytes> {
        let raw = self.transport.transmit_raw(&command.to_bytes())?;
        let mut response = Response::from_bytes(&raw)?;

        if response.status().is_success() {
            return Ok(response.into_payload());
        }

        if !response.status().is_more_data_available() {
            return Err(Error::from(response.status()));
        }

        // Continuation: accumulate fragments until the card reports a final
        // status. The loop is unbounded; the card terminates the chain.
        let mut payload = BytesMut::from(response.payload().as_ref());
        let continuation = Command::new(command.class(), self.send_remaining_ins, 0x00, 0x00);

        loop {
            trace!(status = %response.status(), "requesting remaining response data");
            let raw = self.transport.transmit_raw(&continuation.to_bytes())?;
            response = Response::from_bytes(&raw)?;
            payload.extend_from_slice(response.payload());

            if response.status().is_success() {
                return Ok(payload.freeze());
            }
            if !response.status().is_more_data_available() {
                warn!(status = %response.status(), "continuation aborted by card");
                return Err(Error::from(response.status()));
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.transport.close()?;
        Ok(())
    }
}
