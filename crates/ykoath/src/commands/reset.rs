use tracing::warn;
use ykoath_apdu_core::CardTransport;

use crate::constants::ins;
use crate::error::Result;
use crate::session::OathSession;

impl<T: CardTransport> OathSession<T> {
    /// Wipe the applet back to its just-installed state
    ///
    /// Irreversibly erases all credentials and the access code. The fixed
    /// 0xDE 0xAD parameter bytes are the protocol's confirmation value.
    pub fn reset(&mut self) -> Result<()> {
        warn!("resetting OATH applet, all credentials will be lost");
        self.send(ins::RESET, 0xDE, 0xAD, &[])?;
        Ok(())
    }
}
