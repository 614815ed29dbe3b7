//! In-memory OATH token used by the integration tests
//!
//! Implements the device side of the protocol: credential storage, HMAC
//! computation with HOTP counters, response chunking and the access-code
//! challenge-response, so the client can be exercised end to end without
//! hardware.
#![allow(dead_code)]

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use ykoath::apdu::{Bytes, CardTransport, TransportError};

pub const DEVICE_ID: [u8; 8] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
pub const APPLET_VERSION: [u8; 3] = [5, 4, 3];

const SW_OK: [u8; 2] = [0x90, 0x00];
const SW_AUTH_REQUIRED: [u8; 2] = [0x69, 0x82];
const SW_NO_SUCH_OBJECT: [u8; 2] = [0x69, 0x84];
const SW_WRONG_SYNTAX: [u8; 2] = [0x6A, 0x80];

#[derive(Debug, Clone)]
struct StoredCredential {
    name: Vec<u8>,
    algorithm: u8,
    kind: u8,
    digits: u8,
    key: Vec<u8>,
    touch_required: bool,
    counter: u64,
}

#[derive(Debug)]
pub struct VirtualToken {
    credentials: Vec<StoredCredential>,
    /// Access-code algorithm and derived key, when a code is set
    access: Option<(u8, Vec<u8>)>,
    session_challenge: [u8; 8],
    challenge_counter: u64,
    authenticated: bool,
    /// Maximum payload bytes per response APDU
    chunk: usize,
    remaining: Vec<u8>,
    connected: bool,
}

impl VirtualToken {
    pub fn new() -> Self {
        Self {
            credentials: Vec::new(),
            access: None,
            session_challenge: [0; 8],
            challenge_counter: 0,
            authenticated: false,
            chunk: 0xF0,
            remaining: Vec::new(),
            connected: true,
        }
    }

    /// Limit response payloads to `chunk` bytes, forcing continuation
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Pre-provision an access code, as if SET CODE had already run
    pub fn with_code(mut self, pin: &[u8], algorithm: u8) -> Self {
        self.access = Some((algorithm, derive_access_key(algorithm, pin, &DEVICE_ID)));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn next_session_challenge(&mut self) -> [u8; 8] {
        self.challenge_counter += 1;
        let mut challenge = [0u8; 8];
        challenge.copy_from_slice(&self.challenge_counter.to_be_bytes());
        self.session_challenge = challenge;
        challenge
    }

    fn handle(&mut self, command: &[u8]) -> Vec<u8> {
        let (ins, p1, p2) = (command[1], command[2], command[3]);
        let data: &[u8] = if command.len() > 4 {
            let lc = command[4] as usize;
            &command[5..5 + lc]
        } else {
            &[]
        };

        if ins == 0xA5 {
            return self.next_chunk();
        }
        self.remaining.clear();

        if self.access.is_some()
            && !self.authenticated
            && matches!(ins, 0x01 | 0x02 | 0x03 | 0xA1 | 0xA2)
        {
            return SW_AUTH_REQUIRED.to_vec();
        }

        match ins {
            0xA4 if p1 == 0x04 => self.select(),
            0xA4 => {
                if self.access.is_some() && !self.authenticated {
                    return SW_AUTH_REQUIRED.to_vec();
                }
                self.calculate_all(data, p2)
            }
            0xA1 => self.list(),
            0xA2 => self.calculate(data, p2),
            0x01 => self.put(data),
            0x02 => self.delete(data),
            0x03 => self.set_code(data),
            0xA3 => self.validate(data),
            0x04 if p1 == 0xDE && p2 == 0xAD => self.reset(),
            _ => SW_WRONG_SYNTAX.to_vec(),
        }
    }

    fn select(&mut self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend(tv(0x79, &APPLET_VERSION));
        payload.extend(tv(0x71, &DEVICE_ID));
        if let Some((algorithm, _)) = self.access {
            let challenge = self.next_session_challenge();
            payload.extend(tv(0x74, &challenge));
            payload.extend(tv(0x7B, &[algorithm]));
        }
        self.respond(payload)
    }

    fn list(&mut self) -> Vec<u8> {
        let mut payload = Vec::new();
        for cred in &self.credentials {
            let mut entry = vec![cred.algorithm | cred.kind];
            entry.extend(&cred.name);
            payload.extend(tv(0x72, &entry));
        }
        self.respond(payload)
    }

    fn put(&mut self, data: &[u8]) -> Vec<u8> {
        let records = parse_records(data);
        let name = record(&records, 0x71);
        let key = record(&records, 0x73);
        let (name, key) = match (name, key) {
            (Some(name), Some(key)) if key.len() > 2 => (name, key),
            _ => return SW_WRONG_SYNTAX.to_vec(),
        };

        let counter = record(&records, 0x7A)
            .map(|imf| u32::from_be_bytes([imf[0], imf[1], imf[2], imf[3]]) as u64)
            .unwrap_or(0);

        let cred = StoredCredential {
            name: name.to_vec(),
            algorithm: key[0] & 0x0f,
            kind: key[0] & 0xf0,
            digits: key[1],
            key: key[2..].to_vec(),
            touch_required: record(&records, 0x78) == Some([0x02].as_slice()),
            counter,
        };

        self.credentials.retain(|c| c.name != cred.name);
        self.credentials.push(cred);
        SW_OK.to_vec()
    }

    fn delete(&mut self, data: &[u8]) -> Vec<u8> {
        let records = parse_records(data);
        let Some(name) = record(&records, 0x71) else {
            return SW_WRONG_SYNTAX.to_vec();
        };
        let before = self.credentials.len();
        let name = name.to_vec();
        self.credentials.retain(|c| c.name != name);
        if self.credentials.len() == before {
            SW_NO_SUCH_OBJECT.to_vec()
        } else {
            SW_OK.to_vec()
        }
    }

    fn reset(&mut self) -> Vec<u8> {
        self.credentials.clear();
        self.access = None;
        self.authenticated = false;
        SW_OK.to_vec()
    }

    fn calculate(&mut self, data: &[u8], p2: u8) -> Vec<u8> {
        let records = parse_records(data);
        let (name, challenge) = match (record(&records, 0x71), record(&records, 0x74)) {
            (Some(name), Some(challenge)) => (name.to_vec(), challenge.to_vec()),
            _ => return SW_WRONG_SYNTAX.to_vec(),
        };

        let Some(cred) = self.credentials.iter_mut().find(|c| c.name == name) else {
            return SW_NO_SUCH_OBJECT.to_vec();
        };

        // HOTP ignores the challenge and consumes the internal counter.
        let challenge = if cred.kind == 0x10 {
            let c = cred.counter.to_be_bytes().to_vec();
            cred.counter += 1;
            c
        } else {
            challenge
        };

        let hash = compute_hmac(cred.algorithm, &cred.key, &challenge);
        let digits = cred.digits;

        let payload = if p2 == 0x01 {
            let mut value = vec![digits];
            value.extend(truncate(&hash));
            tv(0x76, &value)
        } else {
            let mut value = vec![digits];
            value.extend(&hash);
            tv(0x75, &value)
        };
        self.respond(payload)
    }

    fn calculate_all(&mut self, data: &[u8], _p2: u8) -> Vec<u8> {
        let records = parse_records(data);
        let Some(challenge) = record(&records, 0x74) else {
            return SW_WRONG_SYNTAX.to_vec();
        };
        let challenge = challenge.to_vec();

        let mut payload = Vec::new();
        for cred in &self.credentials {
            payload.extend(tv(0x71, &cred.name));
            if cred.kind == 0x10 {
                payload.extend(tv(0x77, &[]));
            } else if cred.touch_required {
                payload.extend(tv(0x7C, &[]));
            } else {
                let hash = compute_hmac(cred.algorithm, &cred.key, &challenge);
                let mut value = vec![cred.digits];
                value.extend(truncate(&hash));
                payload.extend(tv(0x76, &value));
            }
        }
        self.respond(payload)
    }

    fn set_code(&mut self, data: &[u8]) -> Vec<u8> {
        let records = parse_records(data);
        let (key, challenge, response) = match (
            record(&records, 0x73),
            record(&records, 0x74),
            record(&records, 0x75),
        ) {
            (Some(key), Some(challenge), Some(response)) if key.len() > 1 => {
                (key, challenge, response)
            }
            _ => return SW_WRONG_SYNTAX.to_vec(),
        };

        let (algorithm, key) = (key[0], &key[1..]);
        if compute_hmac(algorithm, key, challenge) != response {
            return SW_WRONG_SYNTAX.to_vec();
        }

        self.access = Some((algorithm, key.to_vec()));
        self.authenticated = true;
        SW_OK.to_vec()
    }

    fn validate(&mut self, data: &[u8]) -> Vec<u8> {
        let Some((algorithm, key)) = self.access.clone() else {
            return SW_NO_SUCH_OBJECT.to_vec();
        };

        let records = parse_records(data);
        let (response, challenge) = match (record(&records, 0x75), record(&records, 0x74)) {
            (Some(response), Some(challenge)) => (response.to_vec(), challenge.to_vec()),
            _ => return SW_WRONG_SYNTAX.to_vec(),
        };

        // Authentication is granted only on a correct response, but a reply
        // is computed either way so the client's mutual check can fail
        // cleanly on a wrong code.
        let expected = compute_hmac(algorithm, &key, &self.session_challenge);
        if response == expected {
            self.authenticated = true;
        }

        let reply = compute_hmac(algorithm, &key, &challenge);
        self.next_session_challenge();
        let payload = tv(0x75, &reply);
        self.respond(payload)
    }

    fn respond(&mut self, payload: Vec<u8>) -> Vec<u8> {
        self.remaining = payload;
        self.next_chunk()
    }

    fn next_chunk(&mut self) -> Vec<u8> {
        let take = self.remaining.len().min(self.chunk);
        let mut out: Vec<u8> = self.remaining.drain(..take).collect();
        if self.remaining.is_empty() {
            out.extend(SW_OK);
        } else {
            out.extend([0x61, self.remaining.len().min(255) as u8]);
        }
        out
    }
}

impl CardTransport for VirtualToken {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }
        Ok(Bytes::from(self.handle(command)))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }
}

/// Emit one response record; unlike commands, responses always carry an
/// explicit length byte.
fn tv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag, value.len() as u8];
    out.extend(value);
    out
}

/// Parse command records, honoring the property tag's omitted length byte
fn parse_records(mut data: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut records = Vec::new();
    while !data.is_empty() {
        let tag = data[0];
        if tag == 0x78 {
            records.push((tag, vec![data[1]]));
            data = &data[2..];
            continue;
        }
        let len = data[1] as usize;
        records.push((tag, data[2..2 + len].to_vec()));
        data = &data[2 + len..];
    }
    records
}

fn record<'a>(records: &'a [(u8, Vec<u8>)], tag: u8) -> Option<&'a [u8]> {
    records
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, v)| v.as_slice())
}

fn compute_hmac(algorithm: u8, key: &[u8], data: &[u8]) -> Vec<u8> {
    match algorithm {
        0x01 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).unwrap();
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        0x02 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        _ => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).unwrap();
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

fn derive_access_key(algorithm: u8, pin: &[u8], salt: &[u8]) -> Vec<u8> {
    let mut key = vec![0u8; 16];
    match algorithm {
        0x01 => pbkdf2_hmac::<Sha1>(pin, salt, 1000, &mut key),
        0x02 => pbkdf2_hmac::<Sha256>(pin, salt, 1000, &mut key),
        _ => pbkdf2_hmac::<Sha512>(pin, salt, 1000, &mut key),
    }
    key
}

/// RFC 4226/6238 dynamic truncation with the sign bit cleared
fn truncate(hash: &[u8]) -> [u8; 4] {
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[offset..offset + 4]);
    out[0] &= 0x7f;
    out
}
