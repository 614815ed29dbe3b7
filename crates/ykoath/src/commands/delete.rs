use tracing::debug;
use ykoath_apdu_core::CardTransport;

use crate::constants::{ins, tags};
use crate::error::Result;
use crate::session::OathSession;
use crate::tlv;

impl<T: CardTransport> OathSession<T> {
    /// Remove one named credential
    ///
    /// Fails with a "no such object" status if the name is not stored.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.send(
            ins::DELETE,
            0x00,
            0x00,
            &[tlv::encode(tags::NAME, &[name.as_bytes()])],
        )?;
        debug!(name, "deleted credential");
        Ok(())
    }
}
