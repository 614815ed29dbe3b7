//! Stored credentials and their `[timestep/][issuer:]name` label encoding

use std::fmt;
use std::time::Duration;

use crate::constants::{DEFAULT_TIMESTEP, mask};
use crate::error::{Error, Result};
use crate::types::{Algorithm, OathType};

/// An on-device credential as enumerated by LIST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// HMAC algorithm the credential is bound to
    pub algorithm: Algorithm,
    /// HOTP or TOTP
    pub kind: OathType,
    /// Raw credential name, at most 64 bytes
    pub name: String,
}

impl Credential {
    /// Parse a LIST entry: `[algorithm | type][name bytes]`
    pub(crate) fn from_list_entry(value: &[u8]) -> Result<Self> {
        let (&meta, name) = value
            .split_first()
            .ok_or(Error::Decode("empty name-list entry"))?;

        Ok(Self {
            algorithm: Algorithm::try_from(meta & mask::ALGORITHM)?,
            kind: OathType::try_from(meta & mask::TYPE)?,
            name: String::from_utf8(name.to_vec())
                .map_err(|_| Error::Decode("credential name is not valid UTF-8"))?,
        })
    }

    /// Parsed form of the credential name
    pub fn label(&self) -> Label {
        Label::parse(&self.name, self.kind)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.algorithm, self.kind)
    }
}

/// Parsed form of a credential name
///
/// Names follow the grammar `[timestep/][issuer:]name`. The timestep prefix
/// appears only on TOTP credentials with a non-default period; HOTP labels
/// never carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// TOTP period; zero for HOTP credentials
    pub timestep: Duration,
    /// Account issuer, if any
    pub issuer: Option<String>,
    /// Account name
    pub name: String,
}

impl Label {
    /// Parse a raw name
    ///
    /// Never fails: input that does not match the grammar becomes a label
    /// whose name is the whole string.
    pub fn parse(raw: &str, kind: OathType) -> Self {
        if kind == OathType::Hotp {
            let (issuer, name) = split_issuer(raw);
            return Self {
                timestep: Duration::ZERO,
                issuer,
                name,
            };
        }

        let mut timestep = DEFAULT_TIMESTEP;
        let mut rest = raw;

        if let Some((prefix, tail)) = raw.split_once('/') {
            let numeric = !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit());
            if numeric && !tail.is_empty() {
                if let Ok(secs) = prefix.parse::<u64>() {
                    timestep = Duration::from_secs(secs);
                    rest = tail;
                }
            }
        }

        let (issuer, name) = split_issuer(rest);
        Self {
            timestep,
            issuer,
            name,
        }
    }

    /// Render the label back into its on-device name
    ///
    /// The timestep prefix is emitted only when it differs from the default
    /// and the issuer only when present, so canonical labels round-trip.
    pub fn marshal(&self) -> String {
        let mut s = String::new();
        if self.timestep != DEFAULT_TIMESTEP && !self.timestep.is_zero() {
            s.push_str(&self.timestep.as_secs().to_string());
            s.push('/');
        }
        if let Some(issuer) = &self.issuer {
            s.push_str(issuer);
            s.push(':');
        }
        s.push_str(&self.name);
        s
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marshal())
    }
}

fn split_issuer(s: &str) -> (Option<String>, String) {
    match s.split_once(':') {
        Some((issuer, name)) if !issuer.is_empty() && !name.is_empty() => {
            (Some(issuer.to_owned()), name.to_owned())
        }
        _ => (None, s.to_owned()),
    }
}
