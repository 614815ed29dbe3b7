use ykoath_apdu_core::CardTransport;

use crate::constants::{ins, tags};
use crate::error::{Error, Result};
use crate::session::OathSession;
use crate::types::Credential;

impl<T: CardTransport> OathSession<T> {
    /// Enumerate the credentials stored on the token
    pub fn list(&mut self) -> Result<Vec<Credential>> {
        let tvs = self.send(ins::LIST, 0x00, 0x00, &[])?;

        tvs.iter()
            .map(|tv| match tv.tag {
                tags::NAME_LIST => Credential::from_list_entry(&tv.value),
                other => Err(Error::UnexpectedTag(other)),
            })
            .collect()
    }
}
