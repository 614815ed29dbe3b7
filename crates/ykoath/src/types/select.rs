use bytes::Bytes;

use crate::constants::tags;
use crate::error::{Error, Result};
use crate::tlv::TagValue;
use crate::types::{Algorithm, Version};

/// Device identity snapshot returned by SELECT
///
/// `algorithm` and `challenge` are present only while an access code is
/// set; their absence means the applet accepts commands without VALIDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    /// Access-code KDF algorithm, present only when a code is set
    pub algorithm: Option<Algorithm>,
    /// Per-session challenge, present only when a code is set
    pub challenge: Option<Bytes>,
    /// Device-generated ID, used as the PBKDF2 salt
    pub name: Bytes,
    /// Applet version
    pub version: Version,
}

impl Select {
    pub(crate) fn from_tags(tvs: Vec<TagValue>) -> Result<Self> {
        let mut algorithm = None;
        let mut challenge = None;
        let mut name = None;
        let mut version = None;

        for tv in tvs {
            match tv.tag {
                tags::ALGORITHM => {
                    let &[alg] = tv.value.as_ref() else {
                        return Err(Error::Decode("algorithm is not 1 byte"));
                    };
                    algorithm = Some(Algorithm::try_from(alg)?);
                }
                tags::CHALLENGE => challenge = Some(tv.value),
                tags::NAME => name = Some(tv.value),
                tags::VERSION => version = Some(Version::try_from(tv.value.as_ref())?),
                other => return Err(Error::UnexpectedTag(other)),
            }
        }

        Ok(Self {
            algorithm,
            challenge,
            name: name.ok_or(Error::Decode("missing device name"))?,
            version: version.ok_or(Error::Decode("missing applet version"))?,
        })
    }

    /// Whether the applet has an access code set
    pub const fn code_set(&self) -> bool {
        self.challenge.is_some()
    }
}
