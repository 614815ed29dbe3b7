//! Access-code handshake: SET CODE and VALIDATE
//!
//! The code never crosses the wire. Both sides hold a PBKDF2 key derived
//! from the code and the device-generated salt, and prove possession via
//! HMAC over exchanged challenges.

use tracing::debug;
use ykoath_apdu_core::{CardTransport, StatusError};

use crate::constants::{ins, tags};
use crate::error::{Error, Result};
use crate::session::OathSession;
use crate::tlv;
use crate::types::Algorithm;

impl<T: CardTransport> OathSession<T> {
    /// Set or replace the access code
    ///
    /// Derives the access key from `code`, then sends it together with a
    /// challenge/response pair proving the key is usable. Requires an
    /// authenticated session when a code is already set.
    pub fn set_code(&mut self, code: &[u8], algorithm: Algorithm) -> Result<()> {
        let select = self.select()?;
        let key = algorithm.derive_key(code, &select.name);

        let challenge = self.random_challenge();
        let response = algorithm.hmac(key.as_ref(), &challenge);

        self.send(
            ins::SET_CODE,
            0x00,
            0x00,
            &[
                tlv::encode(tags::KEY, &[&[u8::from(algorithm)], key.as_ref()]),
                tlv::encode(tags::CHALLENGE, &[&challenge]),
                tlv::encode(tags::RESPONSE, &[&response]),
            ],
        )?;

        debug!(%algorithm, "access code set");
        Ok(())
    }

    /// Clear the access code
    pub fn remove_code(&mut self) -> Result<()> {
        self.set_code(b"", Algorithm::Sha256)
    }

    /// Authenticate the session against the access code
    ///
    /// Mutual challenge-response: the device's per-session challenge is
    /// answered with an HMAC under the derived key, and the device must in
    /// turn answer a fresh challenge of ours. A wrong code fails the
    /// equality check as [`Error::InvalidTokenResponse`] rather than a
    /// device status error.
    pub fn validate(&mut self, code: &[u8]) -> Result<()> {
        let select = self.select()?;

        let (Some(algorithm), Some(device_challenge)) = (select.algorithm, select.challenge)
        else {
            // No code is configured, so there is nothing to validate
            // against.
            return Err(Error::Status(StatusError::new(0x69, 0x84)));
        };

        let key = algorithm.derive_key(code, &select.name);
        let response = algorithm.hmac(key.as_ref(), &device_challenge);

        let my_challenge = self.random_challenge();
        let expected = algorithm.hmac(key.as_ref(), &my_challenge);

        let tvs = self.send(
            ins::VALIDATE,
            0x00,
            0x00,
            &[
                tlv::encode(tags::RESPONSE, &[&response]),
                tlv::encode(tags::CHALLENGE, &[&my_challenge]),
            ],
        )?;

        let token_response = tvs
            .iter()
            .find(|tv| tv.tag == tags::RESPONSE)
            .map(|tv| tv.value.as_ref());

        if token_response != Some(expected.as_slice()) {
            return Err(Error::InvalidTokenResponse);
        }

        debug!(%algorithm, "session authenticated");
        Ok(())
    }
}
