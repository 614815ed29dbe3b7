//! CALCULATE results and one-time-password truncation

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::OathType;

/// Result of a CALCULATE or CALCULATE ALL exchange for one credential
///
/// Two pending flavors exist only in CALCULATE ALL responses: entries
/// awaiting a physical touch and HOTP entries, neither of which carries a
/// value until calculated individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    hash: Bytes,
    digits: u8,
    kind: OathType,
    touch_required: bool,
    truncated: bool,
}

impl Code {
    /// Build from a truncated response value: `[digits][4-byte code]`
    pub(crate) fn from_truncated(kind: OathType, value: &[u8]) -> Result<Self> {
        let (&digits, hash) = value
            .split_first()
            .ok_or(Error::Decode("empty response value"))?;
        if hash.len() != 4 {
            return Err(Error::Decode("truncated response is not 4 bytes"));
        }
        Ok(Self {
            hash: Bytes::copy_from_slice(hash),
            digits,
            kind,
            touch_required: false,
            truncated: true,
        })
    }

    /// Build from a full response value: `[digits][HMAC digest]`
    ///
    /// The digest must be at least 20 bytes (HMAC-SHA1, the shortest the
    /// device produces) so that every dynamic-truncation offset selects a
    /// complete 4-byte window.
    pub(crate) fn from_full(kind: OathType, value: &[u8]) -> Result<Self> {
        let (&digits, hash) = value
            .split_first()
            .ok_or(Error::Decode("empty response value"))?;
        if hash.len() < 20 {
            return Err(Error::Decode("response digest too short"));
        }
        Ok(Self {
            hash: Bytes::copy_from_slice(hash),
            digits,
            kind,
            touch_required: false,
            truncated: false,
        })
    }

    /// Placeholder for an entry the device will only compute after a touch
    pub(crate) fn touch_pending() -> Self {
        Self {
            hash: Bytes::new(),
            digits: 0,
            kind: OathType::Totp,
            touch_required: true,
            truncated: true,
        }
    }

    /// Placeholder for an HOTP entry that must be calculated individually
    pub(crate) fn hotp_pending() -> Self {
        Self {
            hash: Bytes::new(),
            digits: 0,
            kind: OathType::Hotp,
            touch_required: false,
            truncated: true,
        }
    }

    /// Number of OTP digits (6 or 8)
    pub const fn digits(&self) -> u8 {
        self.digits
    }

    /// HOTP or TOTP
    pub const fn kind(&self) -> OathType {
        self.kind
    }

    /// Whether the device requires a physical touch before computing this entry
    pub const fn touch_required(&self) -> bool {
        self.touch_required
    }

    /// Whether the carried value has a computed code
    ///
    /// False for the touch-pending and HOTP placeholders of CALCULATE ALL.
    pub fn has_value(&self) -> bool {
        !self.hash.is_empty()
    }

    /// Raw response bytes as returned by the device
    pub fn hash(&self) -> &Bytes {
        &self.hash
    }

    /// Render the one-time password as a zero-padded decimal string
    ///
    /// For truncated responses the device already selected the 4 code
    /// bytes; for full responses dynamic truncation (RFC 4226 section 5.3)
    /// is applied here. Returns an empty string for pending placeholders.
    pub fn otp(&self) -> String {
        if !self.has_value() {
            return String::new();
        }

        let value = if self.truncated {
            let tail: [u8; 4] = self.hash[self.hash.len() - 4..]
                .try_into()
                .unwrap_or([0; 4]);
            u32::from_be_bytes(tail)
        } else {
            // from_full guarantees at least 20 digest bytes, so every offset
            // nibble (0..=15) selects a complete window.
            let offset = (self.hash[self.hash.len() - 1] & 0x0f) as usize;
            let window: [u8; 4] = self.hash[offset..offset + 4]
                .try_into()
                .unwrap_or([0; 4]);
            u32::from_be_bytes(window) & 0x7fff_ffff
        };

        let digits = usize::from(self.digits);
        let code = u64::from(value) % 10u64.pow(self.digits.min(9).into());
        format!("{code:0digits$}")
    }
}
