use bytes::Bytes;
use tracing::debug;
use ykoath_apdu_core::CardTransport;

use crate::constants::{ins, tags};
use crate::error::{Error, Result};
use crate::session::{OathSession, TouchCallback};
use crate::tlv;
use crate::types::{Code, OathType};

impl<T: CardTransport> OathSession<T> {
    /// Resolve a credential by partial name and return its one-time password
    ///
    /// Matches `query` case-insensitively as a substring of the stored
    /// names; zero matches and ambiguous matches fail. When the matched
    /// entry awaits a touch or is HOTP, `on_touch` is invoked with the full
    /// name and the entry is then calculated individually. The individual
    /// CALCULATE advances an HOTP credential's device-side counter, so it
    /// is never retried here.
    pub fn calculate(&mut self, query: &str, on_touch: Option<&TouchCallback>) -> Result<String> {
        let entries = self.calculate_all()?;

        let needle = query.to_lowercase();
        let matches: Vec<&(String, Code)> = entries
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .collect();

        let (name, code) = match matches.as_slice() {
            [] => return Err(Error::UnknownName(query.to_owned())),
            [entry] => *entry,
            many => {
                let names: Vec<&str> = many.iter().map(|(name, _)| name.as_str()).collect();
                return Err(Error::MultipleMatches(names.join(",")));
            }
        };

        if code.touch_required() || code.kind() == OathType::Hotp {
            let callback = on_touch.ok_or(Error::TouchCallbackRequired)?;
            callback(name).map_err(Error::TouchCallback)?;

            let name = name.clone();
            let kind = code.kind();
            return Ok(self.calculate_named(&name, kind)?.otp());
        }

        Ok(code.otp())
    }

    /// Compute truncated responses for every stored credential at once
    ///
    /// Returns the entries in device order. Touch-required and HOTP entries
    /// come back as pending placeholders without a value; everything else
    /// carries a truncated code for the current time window.
    pub fn calculate_all(&mut self) -> Result<Vec<(String, Code)>> {
        let challenge = self.totp_challenge();
        let tvs = self.send(
            ins::CALCULATE_ALL,
            0x00,
            0x01,
            &[tlv::encode(tags::CHALLENGE, &[&challenge])],
        )?;

        // Pairing is positional: each name record is immediately followed
        // by the record describing its code.
        let mut entries = Vec::new();
        let mut pending: Option<String> = None;

        for tv in tvs {
            match tv.tag {
                tags::NAME => {
                    if pending.is_some() {
                        return Err(Error::Decode("name record without a code record"));
                    }
                    pending = Some(
                        String::from_utf8(tv.value.to_vec())
                            .map_err(|_| Error::Decode("credential name is not valid UTF-8"))?,
                    );
                }
                tags::TRUNCATED | tags::RESPONSE | tags::HOTP | tags::TOUCH => {
                    let name = pending
                        .take()
                        .ok_or(Error::Decode("code record without a name record"))?;
                    let code = match tv.tag {
                        tags::TRUNCATED => Code::from_truncated(OathType::Totp, &tv.value)?,
                        tags::RESPONSE => Code::from_full(OathType::Totp, &tv.value)?,
                        tags::HOTP => Code::hotp_pending(),
                        _ => Code::touch_pending(),
                    };
                    entries.push((name, code));
                }
                other => return Err(Error::UnexpectedTag(other)),
            }
        }

        if pending.is_some() {
            return Err(Error::Decode("name record without a code record"));
        }

        debug!(entries = entries.len(), "calculated all credentials");
        Ok(entries)
    }

    /// Compute the truncated response for one credential by its exact name
    ///
    /// Bypasses substring matching and the touch workflow; the call blocks
    /// while the device awaits a touch for touch-required credentials. For
    /// HOTP credentials the device ignores the challenge, uses its internal
    /// counter and advances it.
    ///
    /// The CALCULATE response does not identify the credential type, so the
    /// returned code reports TOTP; the stored type is available from the
    /// matching `list` entry.
    pub fn calculate_direct(&mut self, name: &str) -> Result<Code> {
        self.calculate_named(name, OathType::Totp)
    }

    /// Individual CALCULATE with the credential type already known, so the
    /// returned code carries it.
    pub(crate) fn calculate_named(&mut self, name: &str, kind: OathType) -> Result<Code> {
        let challenge = self.totp_challenge();
        let tvs = self.send(
            ins::CALCULATE,
            0x00,
            0x01,
            &[
                tlv::encode(tags::NAME, &[name.as_bytes()]),
                tlv::encode(tags::CHALLENGE, &[&challenge]),
            ],
        )?;

        let tv = tvs.first().ok_or(Error::NoValuesFound)?;
        match tv.tag {
            tags::TRUNCATED => Code::from_truncated(kind, &tv.value),
            other => Err(Error::UnexpectedTag(other)),
        }
    }

    /// Raw challenge-response against one credential
    ///
    /// Sends a caller-supplied challenge and returns the full response
    /// value unprocessed: `[digits][HMAC digest]`.
    pub fn calculate_raw(&mut self, name: &str, challenge: &[u8]) -> Result<Bytes> {
        let tvs = self.send(
            ins::CALCULATE,
            0x00,
            0x00,
            &[
                tlv::encode(tags::NAME, &[name.as_bytes()]),
                tlv::encode(tags::CHALLENGE, &[challenge]),
            ],
        )?;

        let tv = tvs.into_iter().next().ok_or(Error::NoValuesFound)?;
        match tv.tag {
            tags::RESPONSE => Ok(tv.value),
            other => Err(Error::UnexpectedTag(other)),
        }
    }
}
