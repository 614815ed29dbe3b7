//! Status word definitions for APDU responses

use std::fmt;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Check if this status word indicates more data is available (61 XX)
    pub const fn is_more_data_available(&self) -> bool {
        self.sw1 == 0x61
    }

    /// Get the number of remaining bytes when SW1 = 61
    pub const fn remaining_bytes(&self) -> Option<u8> {
        if self.sw1 == 0x61 {
            Some(self.sw2)
        } else {
            None
        }
    }

    /// Check if this status word indicates authentication is required (69 82)
    pub const fn is_auth_required(&self) -> bool {
        self.sw1 == 0x69 && self.sw2 == 0x82
    }

    /// Check if this status word indicates a missing object (69 84)
    pub const fn is_no_such_object(&self) -> bool {
        self.sw1 == 0x69 && self.sw2 == 0x84
    }

    /// Check if this status word indicates wrong syntax / incorrect data (6A 80)
    pub const fn is_wrong_syntax(&self) -> bool {
        self.sw1 == 0x6A && self.sw2 == 0x80
    }

    /// Check if this status word indicates the device is out of space (6A 84)
    pub const fn is_no_space(&self) -> bool {
        self.sw1 == 0x6A && self.sw2 == 0x84
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "success",
            (0x61, _) => "more data available",
            (0x65, 0x81) => "memory failure",
            (0x67, 0x00) => "wrong length",
            (0x69, 0x82) => "authentication required",
            (0x69, 0x84) => "no such object",
            (0x69, 0x85) => "conditions of use not satisfied",
            (0x6A, 0x80) => "wrong syntax",
            (0x6A, 0x84) => "no space",
            (0x6A, 0x86) => "incorrect parameters P1-P2",
            (0x6D, 0x00) => "instruction not supported or invalid",
            (0x6E, 0x00) => "class not supported",
            _ => "unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// Authentication required (69 82)
    pub const AUTH_REQUIRED: StatusWord = StatusWord::new(0x69, 0x82);

    /// No such object (69 84)
    pub const NO_SUCH_OBJECT: StatusWord = StatusWord::new(0x69, 0x84);

    /// Wrong syntax / incorrect data field (6A 80)
    pub const WRONG_SYNTAX: StatusWord = StatusWord::new(0x6A, 0x80);

    /// No space left on the device (6A 84)
    pub const NO_SPACE: StatusWord = StatusWord::new(0x6A, 0x84);

    /// Generic memory failure (65 81)
    pub const GENERIC_ERROR: StatusWord = StatusWord::new(0x65, 0x81);
}
