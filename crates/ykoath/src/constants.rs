use std::time::Duration;

/// Application identifier of the YubiKey OATH applet
pub const OATH_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x21\x01";

/// Default TOTP period
pub const DEFAULT_TIMESTEP: Duration = Duration::from_secs(30);

/// Keys shorter than this are left-padded with zeros before PUT
pub const HMAC_MINIMUM_KEY_SIZE: usize = 14;

/// Maximum length of a credential name in bytes
pub const MAX_NAME_LEN: usize = 64;

/// Instruction bytes
pub mod ins {
    /// Store a new or overwrite an existing credential
    pub const PUT: u8 = 0x01;
    /// Remove a credential by name
    pub const DELETE: u8 = 0x02;
    /// Set or replace the access code
    pub const SET_CODE: u8 = 0x03;
    /// Wipe the applet back to its just-installed state (p1/p2 = 0xDE 0xAD)
    pub const RESET: u8 = 0x04;
    /// Enumerate stored credentials
    pub const LIST: u8 = 0xA1;
    /// Compute a single credential's response
    pub const CALCULATE: u8 = 0xA2;
    /// Authenticate against the access code
    pub const VALIDATE: u8 = 0xA3;
    /// Select the applet (p1 = 0x04); with p1 = 0x00 this is CALCULATE ALL
    pub const SELECT: u8 = 0xA4;
    /// Compute responses for all credentials at once
    pub const CALCULATE_ALL: u8 = 0xA4;
    /// Fetch the next chunk of a split response
    pub const SEND_REMAINING: u8 = 0xA5;
}

/// TLV tags
pub mod tags {
    /// Credential name (also the device ID in the SELECT response)
    pub const NAME: u8 = 0x71;
    /// LIST entry: `[algorithm | type][name bytes]`
    pub const NAME_LIST: u8 = 0x72;
    /// Key material: `[algorithm | type][digits][key]`
    pub const KEY: u8 = 0x73;
    /// HMAC challenge (8-byte big-endian counter)
    pub const CHALLENGE: u8 = 0x74;
    /// Full (untruncated) HMAC response
    pub const RESPONSE: u8 = 0x75;
    /// Truncated response: `[digits][4-byte code]`
    pub const TRUNCATED: u8 = 0x76;
    /// CALCULATE ALL marker: entry is HOTP, calculate it individually
    pub const HOTP: u8 = 0x77;
    /// Credential property byte
    pub const PROPERTY: u8 = 0x78;
    /// Applet version triple
    pub const VERSION: u8 = 0x79;
    /// Initial moving factor for HOTP credentials
    pub const IMF: u8 = 0x7A;
    /// Access code algorithm
    pub const ALGORITHM: u8 = 0x7B;
    /// CALCULATE ALL marker: entry awaits a physical touch
    pub const TOUCH: u8 = 0x7C;
}

/// Credential property bits
pub mod properties {
    /// Require a physical touch before computing a response
    pub const REQUIRE_TOUCH: u8 = 0x02;
}

/// Nibble masks of the combined algorithm/type byte
pub mod mask {
    /// Low nibble: HMAC algorithm
    pub const ALGORITHM: u8 = 0x0f;
    /// High nibble: credential type
    pub const TYPE: u8 = 0xf0;
}
