//! OATH session over a card transport

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::{Bytes, BytesMut};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::trace;
use ykoath_apdu_core::{CardExecutor, CardTransport, Command, Executor};

use crate::constants::{DEFAULT_TIMESTEP, ins};
use crate::error::Result;
use crate::tlv::{self, TagValue};

/// Callback invoked when the device awaits a physical touch
///
/// Receives the matched credential name; may block for however long the
/// human takes. Returning an error aborts the calculation.
pub type TouchCallback =
    dyn Fn(&str) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync;

/// An OATH session with a token
///
/// Owns the transport for its whole lifetime; exchanges are strictly
/// sequential and the underlying exclusive session is released exactly once
/// by [`close`](Self::close). The wall clock and random source are
/// injectable for deterministic tests.
pub struct OathSession<T: CardTransport> {
    executor: CardExecutor<T>,
    clock: Box<dyn Fn() -> SystemTime + Send + Sync>,
    timestep: Duration,
    rng: Box<dyn RngCore + Send>,
}

impl<T: CardTransport> OathSession<T> {
    /// Create a session over a pre-opened transport
    pub fn new(transport: T) -> Self {
        Self {
            executor: CardExecutor::with_send_remaining(transport, ins::SEND_REMAINING),
            clock: Box::new(SystemTime::now),
            timestep: DEFAULT_TIMESTEP,
            rng: Box::new(StdRng::from_os_rng()),
        }
    }

    /// Override the wall-clock source used for TOTP challenges
    pub fn with_clock(mut self, clock: impl Fn() -> SystemTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Override the random source used for access-code challenges
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Override the TOTP period (30 seconds by default)
    pub fn with_timestep(mut self, timestep: Duration) -> Self {
        self.timestep = timestep;
        self
    }

    /// The configured TOTP period
    pub const fn timestep(&self) -> Duration {
        self.timestep
    }

    /// Access the underlying transport
    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// End the session and release the transport's exclusive session
    pub fn close(mut self) -> Result<()> {
        self.executor.close()?;
        Ok(())
    }

    /// Exchange one instruction with the token
    ///
    /// Concatenates the pre-encoded TLV records into the command body and
    /// decodes the reassembled response into its record sequence.
    pub(crate) fn send(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        records: &[Bytes],
    ) -> Result<Vec<TagValue>> {
        trace!(ins = format_args!("{ins:#04X}"), p1, p2, "sending instruction");

        let mut data = BytesMut::new();
        for record in records {
            data.extend_from_slice(record);
        }

        let command = if data.is_empty() {
            Command::new(0x00, ins, p1, p2)
        } else {
            Command::new_with_data(0x00, ins, p1, p2, data.freeze())
        };

        let payload = self.executor.transmit(&command)?;
        tlv::decode(&payload)
    }

    /// Current TOTP challenge: `floor(now / timestep)` as 8 big-endian bytes
    pub(crate) fn totp_challenge(&self) -> Bytes {
        let secs = (self.clock)()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let counter = secs / self.timestep.as_secs().max(1);
        Bytes::copy_from_slice(&counter.to_be_bytes())
    }

    /// Fresh 8-byte random challenge for the access-code handshake
    pub(crate) fn random_challenge(&mut self) -> [u8; 8] {
        let mut challenge = [0u8; 8];
        self.rng.fill_bytes(&mut challenge);
        challenge
    }
}

impl<T: CardTransport> fmt::Debug for OathSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OathSession")
            .field("executor", &self.executor)
            .field("timestep", &self.timestep)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totp_challenge() {
        fn challenge_at(secs: u64, timestep: Duration) -> Bytes {
            struct Dummy;
            impl fmt::Debug for Dummy {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("Dummy")
                }
            }
            impl CardTransport for Dummy {
                fn do_transmit_raw(
                    &mut self,
                    _: &[u8],
                ) -> std::result::Result<Bytes, ykoath_apdu_core::TransportError> {
                    Err(ykoath_apdu_core::TransportError::Transmission)
                }
                fn is_connected(&self) -> bool {
                    false
                }
                fn close(&mut self) -> std::result::Result<(), ykoath_apdu_core::TransportError> {
                    Ok(())
                }
            }

            OathSession::new(Dummy)
                .with_clock(move || UNIX_EPOCH + Duration::from_secs(secs))
                .with_timestep(timestep)
                .totp_challenge()
        }

        // RFC 6238 appendix B: T = 0x0000000000000001 at time 59.
        assert_eq!(
            challenge_at(59, DEFAULT_TIMESTEP).as_ref(),
            &[0, 0, 0, 0, 0, 0, 0, 1]
        );
        assert_eq!(
            challenge_at(1111111109, DEFAULT_TIMESTEP).as_ref(),
            &[0, 0, 0, 0, 0x02, 0x35, 0x23, 0xEC]
        );
        assert_eq!(
            challenge_at(90, Duration::from_secs(45)).as_ref(),
            &[0, 0, 0, 0, 0, 0, 0, 2]
        );
    }
}
