//! HMAC algorithm selection and the crypto dispatch it implies

use std::fmt;

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use crate::error::Error;

/// PBKDF2 iteration count for access-code key derivation
const PBKDF2_ITERATIONS: u32 = 1000;

/// Length of the derived access-code key in bytes
const ACCESS_KEY_LEN: usize = 16;

/// HMAC algorithm a credential or access code is bound to
///
/// Packed into the low nibble of the combined algorithm/type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Algorithm {
    /// HMAC-SHA1
    Sha1 = 0x01,
    /// HMAC-SHA256
    Sha256 = 0x02,
    /// HMAC-SHA512
    Sha512 = 0x03,
}

impl Algorithm {
    /// Input block size of the underlying hash in bytes
    ///
    /// Keys longer than this are reduced to their digest before PUT.
    pub(crate) const fn block_size(self) -> usize {
        match self {
            Self::Sha1 | Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }

    /// Plain digest of `data`
    pub(crate) fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// HMAC of `data` under `key`
    ///
    /// HMAC accepts keys of any length, so construction never fails.
    pub(crate) fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => {
                let mut mac =
                    Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha256 => {
                let mut mac =
                    Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha512 => {
                let mut mac =
                    Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Derive the 16-byte access-code key from a PIN and the device salt
    pub(crate) fn derive_key(self, pin: &[u8], salt: &[u8]) -> Zeroizing<[u8; ACCESS_KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; ACCESS_KEY_LEN]);
        match self {
            Self::Sha1 => pbkdf2_hmac::<Sha1>(pin, salt, PBKDF2_ITERATIONS, key.as_mut()),
            Self::Sha256 => pbkdf2_hmac::<Sha256>(pin, salt, PBKDF2_ITERATIONS, key.as_mut()),
            Self::Sha512 => pbkdf2_hmac::<Sha512>(pin, salt, PBKDF2_ITERATIONS, key.as_mut()),
        }
        key
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Sha1),
            0x02 => Ok(Self::Sha256),
            0x03 => Ok(Self::Sha512),
            other => Err(Error::UnknownAlgorithm(other)),
        }
    }
}

impl From<Algorithm> for u8 {
    fn from(alg: Algorithm) -> Self {
        alg as Self
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("HMAC-SHA1"),
            Self::Sha256 => f.write_str("HMAC-SHA256"),
            Self::Sha512 => f.write_str("HMAC-SHA512"),
        }
    }
}
