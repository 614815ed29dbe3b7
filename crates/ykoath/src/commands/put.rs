use tracing::debug;
use ykoath_apdu_core::CardTransport;
use zeroize::Zeroizing;

use crate::constants::{HMAC_MINIMUM_KEY_SIZE, MAX_NAME_LEN, ins, properties, tags};
use crate::error::{Error, Result};
use crate::session::OathSession;
use crate::tlv;
use crate::types::{Algorithm, OathType};

impl<T: CardTransport> OathSession<T> {
    /// Store a new credential, overwriting any existing one with the same name
    ///
    /// `digits` is 6 or 8. `counter` sets the initial moving factor of an
    /// HOTP credential; pass 0 to omit it. With `touch_required` the device
    /// demands a physical touch before every calculation.
    #[allow(clippy::too_many_arguments)]
    pub fn put(
        &mut self,
        name: &str,
        algorithm: Algorithm,
        kind: OathType,
        digits: u8,
        key: &[u8],
        touch_required: bool,
        counter: u32,
    ) -> Result<()> {
        if name.len() > MAX_NAME_LEN {
            return Err(Error::NameTooLong(name.len()));
        }

        let key = prepare_key(key, algorithm);

        let mut records = vec![
            tlv::encode(tags::NAME, &[name.as_bytes()]),
            tlv::encode(
                tags::KEY,
                &[&[u8::from(algorithm) | u8::from(kind), digits], &key],
            ),
        ];
        if touch_required {
            records.push(tlv::encode(tags::PROPERTY, &[&[properties::REQUIRE_TOUCH]]));
        }
        if counter > 0 {
            records.push(tlv::encode(tags::IMF, &[&counter.to_be_bytes()]));
        }

        self.send(ins::PUT, 0x00, 0x00, &records)?;
        debug!(name, %algorithm, %kind, digits, "stored credential");
        Ok(())
    }
}

/// Bring raw key material into the form the applet stores
///
/// Keys longer than the hash block size are reduced to their digest, then
/// short keys are left-padded with zeros to the 14-byte minimum.
fn prepare_key(key: &[u8], algorithm: Algorithm) -> Zeroizing<Vec<u8>> {
    let key = if key.len() > algorithm.block_size() {
        Zeroizing::new(algorithm.digest(key))
    } else {
        Zeroizing::new(key.to_vec())
    };

    if key.len() >= HMAC_MINIMUM_KEY_SIZE {
        return key;
    }

    let mut padded = Zeroizing::new(vec![0u8; HMAC_MINIMUM_KEY_SIZE]);
    padded[HMAC_MINIMUM_KEY_SIZE - key.len()..].copy_from_slice(&key);
    padded
}
