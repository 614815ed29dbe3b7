use bytes::Bytes;
use tracing::debug;
use ykoath_apdu_core::CardTransport;

use crate::constants::{OATH_AID, ins};
use crate::error::Result;
use crate::session::OathSession;
use crate::types::Select;

impl<T: CardTransport> OathSession<T> {
    /// Select the OATH applet, initializing the device for an OATH session
    ///
    /// The application identifier is sent as a raw payload rather than a
    /// TLV record. Must be the first instruction after connecting; the PIN
    /// commands re-issue it to fetch the per-session challenge.
    pub fn select(&mut self) -> Result<Select> {
        let tvs = self.send(
            ins::SELECT,
            0x04,
            0x00,
            &[Bytes::from_static(OATH_AID)],
        )?;

        let select = Select::from_tags(tvs)?;
        debug!(version = %select.version, code_set = select.code_set(), "selected OATH applet");
        Ok(select)
    }
}
